//! Navigation links surfaced under `important_links`.

use std::collections::BTreeMap;

use shopintel_core::LinkLabel;

use crate::document::ParsedDocument;
use crate::target::ScrapeTarget;

/// For each label, the first anchor whose text contains the label
/// (case-insensitive), resolved against the store base URL.
#[must_use]
pub fn extract_important_links(
    doc: &ParsedDocument,
    target: &ScrapeTarget,
) -> BTreeMap<LinkLabel, String> {
    LinkLabel::ALL
        .into_iter()
        .filter_map(|label| {
            let anchor = doc.first_anchor_with_text(label.as_str())?;
            let href = anchor.value().attr("href")?;
            target.resolve(href).map(|url| (label, url))
        })
        .collect()
}
