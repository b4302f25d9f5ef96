//! Executes one scrape job from `PENDING` to its terminal status.

use std::sync::Arc;

use shopintel_core::{CompetitorSource, JobStatus};
use shopintel_db::JobStore;
use shopintel_scraper::{Scrape, ScrapeTarget};

/// A job ready to run. Competitor jobs carry `expand_competitors = false` so
/// expansion never goes more than one level deep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeTicket {
    pub job_id: i64,
    pub website_url: String,
    pub expand_competitors: bool,
}

impl ScrapeTicket {
    #[must_use]
    pub fn new(job_id: i64, website_url: impl Into<String>) -> Self {
        Self {
            job_id,
            website_url: website_url.into(),
            expand_competitors: true,
        }
    }
}

#[derive(Debug)]
pub struct RunOutcome {
    pub job_id: i64,
    pub status: JobStatus,
    /// `false` when the terminal status could not be written to the store.
    pub persisted: bool,
    /// Competitor jobs created by this run, already stored as `PENDING`.
    pub follow_ups: Vec<ScrapeTicket>,
}

/// Shared collaborators for every job run.
pub struct JobRunner {
    store: Arc<dyn JobStore>,
    scraper: Arc<dyn Scrape>,
    competitors: Arc<dyn CompetitorSource>,
}

impl JobRunner {
    pub fn new(
        store: Arc<dyn JobStore>,
        scraper: Arc<dyn Scrape>,
        competitors: Arc<dyn CompetitorSource>,
    ) -> Self {
        Self {
            store,
            scraper,
            competitors,
        }
    }

    /// Scrapes the ticket's store and records the result. Never fails: every
    /// error ends up in the job status or, if the store itself is failing, in
    /// the returned outcome.
    pub async fn run(&self, ticket: ScrapeTicket) -> RunOutcome {
        let job_id = ticket.job_id;
        tracing::info!(job_id, url = %ticket.website_url, "job: started");

        let (status, write) = match self.scraper.scrape(&ticket.website_url).await {
            Ok(insights) => (
                JobStatus::Completed,
                self.store.complete_job(job_id, &insights).await,
            ),
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!(job_id, error = %reason, "job: scrape failed");
                let write = self.store.fail_job(job_id, &reason).await;
                (JobStatus::Failed(reason), write)
            }
        };

        if let Err(e) = write {
            tracing::error!(job_id, error = %e, "job: failed to record terminal status");
            return RunOutcome {
                job_id,
                status,
                persisted: false,
                follow_ups: Vec::new(),
            };
        }

        let follow_ups = if status.is_completed() && ticket.expand_competitors {
            self.spawn_competitor_jobs(&ticket).await
        } else {
            Vec::new()
        };

        tracing::info!(
            job_id,
            status = %status,
            competitor_jobs = follow_ups.len(),
            "job: finished"
        );

        RunOutcome {
            job_id,
            status,
            persisted: true,
            follow_ups,
        }
    }

    async fn spawn_competitor_jobs(&self, ticket: &ScrapeTicket) -> Vec<ScrapeTicket> {
        let mut follow_ups = Vec::new();

        for raw_url in self.competitors.competitors_for(&ticket.website_url) {
            let target = match ScrapeTarget::parse(&raw_url) {
                Ok(target) => target,
                Err(e) => {
                    tracing::warn!(job_id = ticket.job_id, url = %raw_url, error = %e, "job: skipping invalid competitor URL");
                    continue;
                }
            };

            match self
                .store
                .create_job(target.as_str(), Some(ticket.job_id))
                .await
            {
                Ok(row) => follow_ups.push(ScrapeTicket {
                    job_id: row.id,
                    website_url: row.website_url,
                    expand_competitors: false,
                }),
                Err(e) => {
                    tracing::error!(job_id = ticket.job_id, url = %target, error = %e, "job: failed to create competitor job");
                }
            }
        }

        follow_ups
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use shopintel_core::BrandInsights;
    use shopintel_scraper::{Scrape, ScrapeError};

    /// Succeeds with an empty record for any URL not containing `down`.
    pub(crate) struct StubScraper;

    #[async_trait]
    impl Scrape for StubScraper {
        async fn scrape(&self, website_url: &str) -> Result<BrandInsights, ScrapeError> {
            if website_url.contains("down") {
                return Err(ScrapeError::UnreachableSite {
                    url: website_url.to_string(),
                    reason: "HTTP 503 Service Unavailable".to_string(),
                });
            }
            Ok(BrandInsights::empty(website_url))
        }
    }
}
