//! Normalized storefront base URL.

use reqwest::Url;

use crate::error::ScrapeError;

/// Base URL of the store being scraped, without a trailing slash.
///
/// `as_str()` is the value reported as `website_url`; relative links found
/// on any page are resolved against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeTarget {
    base: String,
    url: Url,
}

impl ScrapeTarget {
    /// Parses and normalizes a user-supplied store URL.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::InvalidTarget`] unless the input is an absolute
    /// `http`/`https` URL with a host.
    pub fn parse(raw: &str) -> Result<Self, ScrapeError> {
        let trimmed = raw.trim();
        let invalid = |reason: &str| ScrapeError::InvalidTarget {
            url: trimmed.to_owned(),
            reason: reason.to_owned(),
        };

        let mut url = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host"));
        }
        url.set_fragment(None);

        let base = url.as_str().trim_end_matches('/').to_owned();
        let url = Url::parse(&base).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self { base, url })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// `<base>/products.json`.
    #[must_use]
    pub fn products_url(&self) -> String {
        format!("{}/products.json", self.base)
    }

    /// Resolves an anchor `href` against the base URL.
    ///
    /// Returns `None` for empty and `javascript:` hrefs, and for anything the
    /// URL parser rejects.
    #[must_use]
    pub fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.to_ascii_lowercase().starts_with("javascript:") {
            return None;
        }
        self.url.join(href).ok().map(String::from)
    }
}

impl std::fmt::Display for ScrapeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base)
    }
}
