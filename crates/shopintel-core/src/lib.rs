pub mod app_config;
pub mod competitors;
pub mod config;
pub mod insights;
pub mod jobs;

pub use app_config::{AppConfig, Environment};
pub use competitors::{load_competitors, CompetitorEntry, CompetitorSource, StaticCompetitors};
pub use config::{load_app_config, load_app_config_from_env};
pub use insights::{
    BrandInsights, ContactDetails, FaqEntry, LinkLabel, ProductRecord, SocialPlatform,
    CONTEXT_NOT_FOUND, POLICY_NOT_FOUND,
};
pub use jobs::{JobStatus, UnknownJobStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read competitors file {path}: {source}")]
    CompetitorsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse competitors file: {0}")]
    CompetitorsFileParse(#[source] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
