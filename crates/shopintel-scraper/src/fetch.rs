//! HTTP fetcher shared by every extractor in one scrape.

use std::time::Duration;

use reqwest::Client;
use shopintel_core::AppConfig;

use crate::document::ParsedDocument;
use crate::error::ScrapeError;

/// One `reqwest::Client` with a fixed browser `User-Agent`, plus the
/// per-request timeouts for HTML pages and the catalog endpoint.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    page_timeout: Duration,
    catalog_timeout: Duration,
}

impl Fetcher {
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        user_agent: &str,
        page_timeout_secs: u64,
        catalog_timeout_secs: u64,
    ) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(page_timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            page_timeout: Duration::from_secs(page_timeout_secs),
            catalog_timeout: Duration::from_secs(catalog_timeout_secs),
        })
    }

    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ScrapeError> {
        Self::new(
            &config.scraper_user_agent,
            config.scraper_page_timeout_secs,
            config.scraper_catalog_timeout_secs,
        )
    }

    /// Fetches an HTML page and parses it.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::UnreachableSite`] on connection failure,
    /// timeout, or a non-2xx status.
    pub async fn fetch_page(&self, url: &str) -> Result<ParsedDocument, ScrapeError> {
        let body = self.get_text(url, self.page_timeout).await?;
        Ok(ParsedDocument::parse(url, &body))
    }

    /// Fetches the raw catalog body with the shorter catalog timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::UnreachableSite`] on connection failure,
    /// timeout, or a non-2xx status.
    pub async fn fetch_catalog_body(&self, url: &str) -> Result<String, ScrapeError> {
        self.get_text(url, self.catalog_timeout).await
    }

    async fn get_text(&self, url: &str, timeout: Duration) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/json;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ScrapeError::unreachable(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::unreachable(url, format!("HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| ScrapeError::unreachable(url, e))
    }
}
