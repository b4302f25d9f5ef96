//! Scrape job lifecycle status.

use std::str::FromStr;

const PENDING: &str = "PENDING";
const COMPLETED: &str = "COMPLETED";
const FAILED: &str = "FAILED";

/// Status of a scrape job as persisted in the job store.
///
/// Rendered as `PENDING`, `COMPLETED` or `FAILED: <reason>`. A job leaves
/// `Pending` exactly once and never returns to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Completed,
    Failed(String),
}

impl JobStatus {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, JobStatus::Completed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => f.write_str(PENDING),
            JobStatus::Completed => f.write_str(COMPLETED),
            JobStatus::Failed(reason) => write!(f, "{FAILED}: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized job status: {0}")]
pub struct UnknownJobStatus(pub String);

impl FromStr for JobStatus {
    type Err = UnknownJobStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PENDING => Ok(JobStatus::Pending),
            COMPLETED => Ok(JobStatus::Completed),
            _ => s
                .strip_prefix(FAILED)
                .map(|rest| {
                    let reason = rest.strip_prefix(':').unwrap_or(rest).trim();
                    JobStatus::Failed(reason.to_string())
                })
                .ok_or_else(|| UnknownJobStatus(s.to_string())),
        }
    }
}
