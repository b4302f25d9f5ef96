//! Brand context and policy texts read from pages linked off the homepage.

use crate::document::ParsedDocument;
use crate::fetch::Fetcher;
use crate::target::ScrapeTarget;

/// Link keywords for the privacy policy page.
pub const PRIVACY_KEYWORDS: &[&str] = &["privacy"];

/// Link keywords for the refund/return policy page, tried in order.
pub const REFUND_KEYWORDS: &[&str] = &["refund", "return"];

/// Link keywords for the brand's about page, tried in order.
pub const CONTEXT_KEYWORDS: &[&str] = &["about us", "our story"];

/// One candidate URL per keyword, in keyword order.
///
/// For each keyword only the first anchor whose text contains it is
/// considered; keywords whose first anchor has no usable `href` are skipped.
#[must_use]
pub fn find_linked_pages(
    doc: &ParsedDocument,
    target: &ScrapeTarget,
    keywords: &[&str],
) -> Vec<String> {
    keywords
        .iter()
        .filter_map(|keyword| {
            let anchor = doc.first_anchor_with_text(keyword)?;
            let href = anchor.value().attr("href")?;
            target.resolve(href)
        })
        .collect()
}

/// Fetches candidates in order and returns the first non-empty
/// `<main>`/`<body>` text. A failed fetch moves on to the next candidate.
pub async fn read_first_linked_page(fetcher: &Fetcher, candidates: &[String]) -> Option<String> {
    for url in candidates {
        let text = match fetcher.fetch_page(url).await {
            Ok(page) => page_text(&page),
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "linked page fetch failed");
                continue;
            }
        };
        if text.is_some() {
            return text;
        }
        tracing::debug!(url = %url, "linked page has no readable text");
    }
    None
}

/// Readable text of a linked page, `None` when it is blank.
#[must_use]
pub fn page_text(page: &ParsedDocument) -> Option<String> {
    page.main_text().filter(|text| !text.is_empty())
}
