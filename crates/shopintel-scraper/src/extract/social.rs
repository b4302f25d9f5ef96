//! Social profile links from homepage anchors.

use std::collections::BTreeMap;

use shopintel_core::SocialPlatform;

use crate::document::ParsedDocument;
use crate::target::ScrapeTarget;

/// For each platform, the first anchor whose `href` contains the platform
/// domain, resolved against the store base URL. Platforms with no such
/// anchor are omitted.
#[must_use]
pub fn extract_social_handles(
    doc: &ParsedDocument,
    target: &ScrapeTarget,
) -> BTreeMap<SocialPlatform, String> {
    SocialPlatform::ALL
        .into_iter()
        .filter_map(|platform| {
            let anchor = doc.first_anchor_with_href(platform.domain())?;
            let href = anchor.value().attr("href")?;
            target.resolve(href).map(|url| (platform, url))
        })
        .collect()
}
