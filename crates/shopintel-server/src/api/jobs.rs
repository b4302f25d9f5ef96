//! Scrape job submission and result polling.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use shopintel_core::BrandInsights;
use shopintel_scraper::ScrapeTarget;

use crate::middleware::RequestId;
use crate::runner::ScrapeTicket;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CreateScrapeJobRequest {
    pub website_url: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ScrapeJobAccepted {
    job_id: i64,
    website_url: String,
    status: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ScrapeJobResult {
    job_id: i64,
    status: String,
    website_url: String,
    /// Present only once the job is `COMPLETED`; serialized as `null` otherwise.
    data: Option<BrandInsights>,
}

#[derive(Debug, Serialize)]
pub(super) struct CompetitorJobItem {
    job_id: i64,
    parent_job_id: Option<i64>,
    website_url: String,
    status: String,
}

pub(super) async fn create_scrape_job(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateScrapeJobRequest>,
) -> Result<(StatusCode, Json<ScrapeJobAccepted>), ApiError> {
    let target = ScrapeTarget::parse(&body.website_url)
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let row = state
        .store
        .create_job(target.as_str(), None)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if let Err(e) = state
        .dispatcher
        .submit(ScrapeTicket::new(row.id, &row.website_url))
    {
        tracing::error!(job_id = row.id, error = %e, "failed to schedule scrape job");
        if let Err(db) = state.store.fail_job(row.id, &e.to_string()).await {
            tracing::error!(job_id = row.id, error = %db, "failed to mark unscheduled job");
        }
        return Err(ApiError::new(
            req_id.0,
            "unavailable",
            "scrape job could not be scheduled",
        ));
    }

    tracing::info!(job_id = row.id, url = %row.website_url, "scrape job accepted");

    Ok((
        StatusCode::ACCEPTED,
        Json(ScrapeJobAccepted {
            job_id: row.id,
            website_url: row.website_url,
            status: row.status,
        }),
    ))
}

pub(super) async fn get_results(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(job_id): Path<i64>,
) -> Result<Json<ScrapeJobResult>, ApiError> {
    let row = state
        .store
        .get_job(job_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "Job not found"))?;

    let data = row
        .insights()
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ScrapeJobResult {
        job_id: row.id,
        status: row.status,
        website_url: row.website_url,
        data,
    }))
}

pub(super) async fn list_competitor_jobs(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(job_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<CompetitorJobItem>>>, ApiError> {
    state
        .store
        .get_job(job_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "Job not found"))?;

    let rows = state
        .store
        .list_child_jobs(job_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| CompetitorJobItem {
            job_id: row.id,
            parent_job_id: row.parent_job_id,
            website_url: row.website_url,
            status: row.status,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
