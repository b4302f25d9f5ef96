//! Scrape job records: the `JobStore` seam and its Postgres implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shopintel_core::{BrandInsights, JobStatus};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `scrape_jobs` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ScrapeJobRow {
    pub id: i64,
    /// Set on competitor jobs spawned by another job.
    pub parent_job_id: Option<i64>,
    pub website_url: String,
    /// `PENDING`, `COMPLETED` or `FAILED: <reason>`.
    pub status: String,
    /// Serialized `BrandInsights`; only present once `COMPLETED`.
    pub data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ScrapeJobRow {
    /// # Errors
    ///
    /// Returns [`DbError::InvalidStatus`] if the stored status string is not
    /// one the job lifecycle produces.
    pub fn job_status(&self) -> Result<JobStatus, DbError> {
        Ok(self.status.parse()?)
    }

    /// The stored insights, when the job has completed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the stored payload no longer
    /// matches the `BrandInsights` shape.
    pub fn insights(&self) -> Result<Option<BrandInsights>, DbError> {
        if !self.job_status()?.is_completed() {
            return Ok(None);
        }
        self.data
            .clone()
            .map(serde_json::from_value)
            .transpose()
            .map_err(DbError::from)
    }
}

// ---------------------------------------------------------------------------
// Store seam
// ---------------------------------------------------------------------------

/// Persistence for scrape jobs.
///
/// Every operation acquires its own connection; a handle may be shared freely
/// between the API and concurrently running jobs. A job leaves `PENDING`
/// exactly once: `complete_job` and `fail_job` refuse any other transition
/// with [`DbError::InvalidJobTransition`].
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Inserts a `PENDING` job and returns the stored row.
    async fn create_job(
        &self,
        website_url: &str,
        parent_job_id: Option<i64>,
    ) -> Result<ScrapeJobRow, DbError>;

    async fn get_job(&self, id: i64) -> Result<Option<ScrapeJobRow>, DbError>;

    /// `PENDING` → `COMPLETED`, storing the insights payload.
    async fn complete_job(&self, id: i64, insights: &BrandInsights) -> Result<(), DbError>;

    /// `PENDING` → `FAILED: <reason>`.
    async fn fail_job(&self, id: i64, reason: &str) -> Result<(), DbError>;

    /// Jobs created with `parent_job_id = parent_id`, oldest first.
    async fn list_child_jobs(&self, parent_id: i64) -> Result<Vec<ScrapeJobRow>, DbError>;
}

// ---------------------------------------------------------------------------
// Postgres implementation
// ---------------------------------------------------------------------------

/// [`JobStore`] backed by the `scrape_jobs` table.
#[derive(Debug, Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn create_job(
        &self,
        website_url: &str,
        parent_job_id: Option<i64>,
    ) -> Result<ScrapeJobRow, DbError> {
        let row = sqlx::query_as::<_, ScrapeJobRow>(
            "INSERT INTO scrape_jobs (website_url, parent_job_id, status) \
             VALUES ($1, $2, 'PENDING') \
             RETURNING id, parent_job_id, website_url, status, data, created_at, completed_at",
        )
        .bind(website_url)
        .bind(parent_job_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_job(&self, id: i64) -> Result<Option<ScrapeJobRow>, DbError> {
        let row = sqlx::query_as::<_, ScrapeJobRow>(
            "SELECT id, parent_job_id, website_url, status, data, created_at, completed_at \
             FROM scrape_jobs \
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn complete_job(&self, id: i64, insights: &BrandInsights) -> Result<(), DbError> {
        let data = serde_json::to_value(insights)?;

        let result = sqlx::query(
            "UPDATE scrape_jobs \
             SET status = 'COMPLETED', data = $1, completed_at = NOW() \
             WHERE id = $2 AND status = 'PENDING'",
        )
        .bind(data)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::InvalidJobTransition {
                id,
                expected_status: "PENDING",
            });
        }

        Ok(())
    }

    async fn fail_job(&self, id: i64, reason: &str) -> Result<(), DbError> {
        let status = JobStatus::Failed(reason.to_string()).to_string();

        let result = sqlx::query(
            "UPDATE scrape_jobs \
             SET status = $1, completed_at = NOW() \
             WHERE id = $2 AND status = 'PENDING'",
        )
        .bind(status)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::InvalidJobTransition {
                id,
                expected_status: "PENDING",
            });
        }

        Ok(())
    }

    async fn list_child_jobs(&self, parent_id: i64) -> Result<Vec<ScrapeJobRow>, DbError> {
        let rows = sqlx::query_as::<_, ScrapeJobRow>(
            "SELECT id, parent_job_id, website_url, status, data, created_at, completed_at \
             FROM scrape_jobs \
             WHERE parent_job_id = $1 \
             ORDER BY id",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
