//! Structured brand record assembled from a storefront scrape.
//!
//! Field names and nesting are part of the public API payload returned by
//! `GET /results/{job_id}` and must stay stable.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Placeholder stored in `brand_context` when no about page could be read.
pub const CONTEXT_NOT_FOUND: &str = "Context not found.";

/// Placeholder stored in `privacy_policy` / `refund_policy` when no policy
/// page could be read.
pub const POLICY_NOT_FOUND: &str = "Policy not found.";

/// One product from the storefront's `products.json` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Shopify numeric product ID.
    pub id: i64,
    pub title: String,
    pub vendor: String,
    pub product_type: String,
    pub handle: String,
    /// Creation timestamp exactly as the store reports it. Not parsed.
    pub created_at: String,
    /// Price of the first variant, `0.0` when the product has no variants or
    /// the first variant carries no price.
    pub price: f64,
    /// Raw variant objects, passed through untouched.
    pub variants: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// Social platforms looked for in homepage anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Instagram,
    Facebook,
    Twitter,
    Youtube,
    Tiktok,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 5] = [
        SocialPlatform::Instagram,
        SocialPlatform::Facebook,
        SocialPlatform::Twitter,
        SocialPlatform::Youtube,
        SocialPlatform::Tiktok,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SocialPlatform::Instagram => "instagram",
            SocialPlatform::Facebook => "facebook",
            SocialPlatform::Twitter => "twitter",
            SocialPlatform::Youtube => "youtube",
            SocialPlatform::Tiktok => "tiktok",
        }
    }

    /// Lower-case domain fragment an anchor `href` must contain to count as a
    /// profile link for this platform.
    #[must_use]
    pub fn domain(self) -> &'static str {
        match self {
            SocialPlatform::Instagram => "instagram.com",
            SocialPlatform::Facebook => "facebook.com",
            SocialPlatform::Twitter => "twitter.com",
            SocialPlatform::Youtube => "youtube.com",
            SocialPlatform::Tiktok => "tiktok.com",
        }
    }
}

impl std::fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation links surfaced under `important_links`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LinkLabel {
    #[serde(rename = "Contact")]
    Contact,
    #[serde(rename = "Track Order")]
    TrackOrder,
    #[serde(rename = "Blog")]
    Blog,
}

impl LinkLabel {
    pub const ALL: [LinkLabel; 3] = [LinkLabel::Contact, LinkLabel::TrackOrder, LinkLabel::Blog];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LinkLabel::Contact => "Contact",
            LinkLabel::TrackOrder => "Track Order",
            LinkLabel::Blog => "Blog",
        }
    }
}

impl std::fmt::Display for LinkLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique email addresses and phone numbers found in homepage text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub emails: BTreeSet<String>,
    pub phones: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandInsights {
    pub website_url: String,
    pub product_catalog: Vec<ProductRecord>,
    pub hero_products: Vec<String>,
    pub social_handles: BTreeMap<SocialPlatform, String>,
    pub contact_details: ContactDetails,
    pub faqs: Vec<FaqEntry>,
    pub important_links: BTreeMap<LinkLabel, String>,
    #[serde(default = "context_not_found")]
    pub brand_context: String,
    #[serde(default = "policy_not_found")]
    pub privacy_policy: String,
    #[serde(default = "policy_not_found")]
    pub refund_policy: String,
}

impl BrandInsights {
    /// A record with nothing extracted: empty collections and sentinel texts.
    #[must_use]
    pub fn empty(website_url: impl Into<String>) -> Self {
        Self {
            website_url: website_url.into(),
            product_catalog: Vec::new(),
            hero_products: Vec::new(),
            social_handles: BTreeMap::new(),
            contact_details: ContactDetails::default(),
            faqs: Vec::new(),
            important_links: BTreeMap::new(),
            brand_context: context_not_found(),
            privacy_policy: policy_not_found(),
            refund_policy: policy_not_found(),
        }
    }
}

fn context_not_found() -> String {
    CONTEXT_NOT_FOUND.to_string()
}

fn policy_not_found() -> String {
    POLICY_NOT_FOUND.to_string()
}
