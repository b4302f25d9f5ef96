//! Brand insight orchestration: one homepage fetch, then the follow-up
//! fetches, assembled into a single [`BrandInsights`] record.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::FutureExt;
use shopintel_core::{
    AppConfig, BrandInsights, ContactDetails, LinkLabel, SocialPlatform, CONTEXT_NOT_FOUND,
    POLICY_NOT_FOUND,
};

use crate::document::ParsedDocument;
use crate::error::ScrapeError;
use crate::extract::{
    catalog, contact, faq, hero, linked_page, links, social, CONTEXT_KEYWORDS, PRIVACY_KEYWORDS,
    REFUND_KEYWORDS,
};
use crate::fetch::Fetcher;
use crate::target::ScrapeTarget;

/// Anything that can turn a store URL into a [`BrandInsights`] record.
///
/// The job runner depends on this rather than on [`BrandScraper`] directly
/// so that it can be driven without network access.
#[async_trait]
pub trait Scrape: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ScrapeError::InvalidTarget`] for an unusable URL,
    /// [`ScrapeError::UnreachableSite`] when the homepage cannot be fetched,
    /// and [`ScrapeError::ScrapingFailed`] for unexpected extraction errors.
    async fn scrape(&self, website_url: &str) -> Result<BrandInsights, ScrapeError>;
}

/// Everything the follow-up phase needs from the homepage, detached from the
/// parsed document.
#[derive(Debug)]
struct HomepageScan {
    social_handles: BTreeMap<SocialPlatform, String>,
    contact_details: ContactDetails,
    important_links: BTreeMap<LinkLabel, String>,
    /// Lower-cased concatenation of every visible text node.
    text: String,
    faq_page: Option<String>,
    privacy_pages: Vec<String>,
    refund_pages: Vec<String>,
    context_pages: Vec<String>,
}

impl HomepageScan {
    fn collect(homepage: &ParsedDocument, target: &ScrapeTarget) -> Self {
        Self {
            social_handles: social::extract_social_handles(homepage, target),
            contact_details: contact::extract_contact_details(homepage),
            important_links: links::extract_important_links(homepage, target),
            text: homepage.visible_text("").to_lowercase(),
            faq_page: faq::find_faq_page(homepage, target),
            privacy_pages: linked_page::find_linked_pages(homepage, target, PRIVACY_KEYWORDS),
            refund_pages: linked_page::find_linked_pages(homepage, target, REFUND_KEYWORDS),
            context_pages: linked_page::find_linked_pages(homepage, target, CONTEXT_KEYWORDS),
        }
    }
}

/// Scrapes a Shopify storefront into a [`BrandInsights`] record.
///
/// Only an unreachable homepage or an unexpected extraction failure aborts a
/// scrape; every other problem leaves the affected field empty or at its
/// placeholder text.
#[derive(Debug, Clone)]
pub struct BrandScraper {
    fetcher: Fetcher,
}

impl BrandScraper {
    #[must_use]
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the HTTP client cannot be built.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ScrapeError> {
        Fetcher::from_app_config(config).map(Self::new)
    }

    /// Scrapes an already-normalized target.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::UnreachableSite`] when the homepage fetch
    /// fails and [`ScrapeError::ScrapingFailed`] if an extractor panics.
    pub async fn scrape_target(&self, target: &ScrapeTarget) -> Result<BrandInsights, ScrapeError> {
        tracing::info!(url = %target, "scrape: fetching homepage");

        let scan = {
            let homepage = self.fetcher.fetch_page(target.as_str()).await?;
            std::panic::catch_unwind(AssertUnwindSafe(|| {
                HomepageScan::collect(&homepage, target)
            }))
            .map_err(|payload| scraping_failed(&*payload))?
        };

        let insights = AssertUnwindSafe(self.follow_up(target, scan))
            .catch_unwind()
            .await
            .map_err(|payload| scraping_failed(&*payload))?;

        tracing::info!(
            url = %target,
            products = insights.product_catalog.len(),
            hero_products = insights.hero_products.len(),
            faqs = insights.faqs.len(),
            "scrape: complete"
        );
        Ok(insights)
    }

    async fn follow_up(&self, target: &ScrapeTarget, scan: HomepageScan) -> BrandInsights {
        let (product_catalog, faqs, privacy_policy, refund_policy, brand_context) = tokio::join!(
            catalog::fetch_catalog(&self.fetcher, target),
            faq::scrape_faqs(&self.fetcher, scan.faq_page.as_deref()),
            linked_page::read_first_linked_page(&self.fetcher, &scan.privacy_pages),
            linked_page::read_first_linked_page(&self.fetcher, &scan.refund_pages),
            linked_page::read_first_linked_page(&self.fetcher, &scan.context_pages),
        );

        let hero_products = hero::find_hero_products(&product_catalog, &scan.text);

        BrandInsights {
            website_url: target.as_str().to_owned(),
            product_catalog,
            hero_products,
            social_handles: scan.social_handles,
            contact_details: scan.contact_details,
            faqs,
            important_links: scan.important_links,
            brand_context: brand_context.unwrap_or_else(|| CONTEXT_NOT_FOUND.to_owned()),
            privacy_policy: privacy_policy.unwrap_or_else(|| POLICY_NOT_FOUND.to_owned()),
            refund_policy: refund_policy.unwrap_or_else(|| POLICY_NOT_FOUND.to_owned()),
        }
    }
}

#[async_trait]
impl Scrape for BrandScraper {
    async fn scrape(&self, website_url: &str) -> Result<BrandInsights, ScrapeError> {
        let target = ScrapeTarget::parse(website_url)?;
        self.scrape_target(&target).await
    }
}

fn scraping_failed(payload: &(dyn Any + Send)) -> ScrapeError {
    let cause = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "extractor panicked".to_owned());
    tracing::error!(cause = %cause, "scrape: extraction panicked");
    ScrapeError::ScrapingFailed { cause }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn homepage_scan_collects_every_homepage_field() {
        let target = ScrapeTarget::parse("https://shop.example").unwrap();
        let homepage = ParsedDocument::parse(
            target.as_str(),
            r#"<body>
                <h1>Linen Shirt</h1>
                <p>Mail hello@shop.example</p>
                <a href="https://instagram.com/shop">IG</a>
                <a href="/pages/faq">FAQ</a>
                <a href="/policies/privacy-policy">Privacy Policy</a>
                <a href="/policies/refund-policy">Refund Policy</a>
                <a href="/pages/about">About Us</a>
                <a href="/blogs/news">Blog</a>
            </body>"#,
        );

        let scan = HomepageScan::collect(&homepage, &target);

        assert!(scan.text.contains("linen shirt"));
        assert!(scan.contact_details.emails.contains("hello@shop.example"));
        assert_eq!(scan.social_handles.len(), 1);
        assert_eq!(scan.important_links.len(), 1);
        assert_eq!(scan.faq_page.as_deref(), Some("https://shop.example/pages/faq"));
        assert_eq!(scan.privacy_pages.len(), 1);
        assert_eq!(scan.refund_pages.len(), 1);
        assert_eq!(scan.context_pages, vec!["https://shop.example/pages/about".to_string()]);
    }

    #[test]
    fn panic_payloads_become_scraping_failed() {
        let payload: Box<dyn Any + Send> = Box::new("index out of bounds");
        let err = scraping_failed(&*payload);
        assert!(
            matches!(&err, ScrapeError::ScrapingFailed { cause } if cause == "index out of bounds"),
            "got: {err:?}"
        );

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert!(scraping_failed(&*payload).to_string().ends_with("owned message"));
    }
}
