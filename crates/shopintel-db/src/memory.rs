//! In-process [`JobStore`] used when no `DATABASE_URL` is configured.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use shopintel_core::{BrandInsights, JobStatus};
use tokio::sync::Mutex;

use crate::scrape_jobs::{JobStore, ScrapeJobRow};
use crate::DbError;

#[derive(Debug, Default)]
struct Jobs {
    last_id: i64,
    rows: BTreeMap<i64, ScrapeJobRow>,
}

/// Job records held in memory for the lifetime of the process. Applies the
/// same transition rules as the Postgres store.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: Mutex<Jobs>,
}

impl MemoryJobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves a `PENDING` row to `status`, attaching `data`.
    async fn finish(
        &self,
        id: i64,
        status: JobStatus,
        data: Option<serde_json::Value>,
    ) -> Result<(), DbError> {
        let mut jobs = self.jobs.lock().await;
        let row = jobs
            .rows
            .get_mut(&id)
            .filter(|row| row.status == JobStatus::Pending.to_string())
            .ok_or(DbError::InvalidJobTransition {
                id,
                expected_status: "PENDING",
            })?;

        row.status = status.to_string();
        row.data = data;
        row.completed_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create_job(
        &self,
        website_url: &str,
        parent_job_id: Option<i64>,
    ) -> Result<ScrapeJobRow, DbError> {
        let mut jobs = self.jobs.lock().await;
        if let Some(parent) = parent_job_id {
            if !jobs.rows.contains_key(&parent) {
                return Err(DbError::NotFound);
            }
        }

        jobs.last_id += 1;
        let row = ScrapeJobRow {
            id: jobs.last_id,
            parent_job_id,
            website_url: website_url.to_string(),
            status: JobStatus::Pending.to_string(),
            data: None,
            created_at: Utc::now(),
            completed_at: None,
        };
        jobs.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_job(&self, id: i64) -> Result<Option<ScrapeJobRow>, DbError> {
        Ok(self.jobs.lock().await.rows.get(&id).cloned())
    }

    async fn complete_job(&self, id: i64, insights: &BrandInsights) -> Result<(), DbError> {
        let data = serde_json::to_value(insights)?;
        self.finish(id, JobStatus::Completed, Some(data)).await
    }

    async fn fail_job(&self, id: i64, reason: &str) -> Result<(), DbError> {
        self.finish(id, JobStatus::Failed(reason.to_string()), None)
            .await
    }

    async fn list_child_jobs(&self, parent_id: i64) -> Result<Vec<ScrapeJobRow>, DbError> {
        Ok(self
            .jobs
            .lock()
            .await
            .rows
            .values()
            .filter(|row| row.parent_job_id == Some(parent_id))
            .cloned()
            .collect())
    }
}
