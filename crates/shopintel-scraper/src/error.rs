use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid store URL \"{url}\": {reason}")]
    InvalidTarget { url: String, reason: String },

    /// DNS/connection failure, timeout, or non-success status.
    #[error("failed to connect to {url}: {reason}")]
    UnreachableSite { url: String, reason: String },

    #[error("malformed product catalog from {url}: {reason}")]
    MalformedCatalog { url: String, reason: String },

    /// Anything unexpected during extraction. The only orchestrator-level
    /// error besides an unreachable homepage.
    #[error("an error occurred during scraping: {cause}")]
    ScrapingFailed { cause: String },
}

impl ScrapeError {
    pub(crate) fn unreachable(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::UnreachableSite {
            url: url.to_owned(),
            reason: reason.to_string(),
        }
    }
}
