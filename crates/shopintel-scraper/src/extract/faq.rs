//! Question/answer pairs from the store's FAQ page.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use shopintel_core::FaqEntry;

use crate::document::{normalized_text, ParsedDocument};
use crate::fetch::Fetcher;
use crate::target::ScrapeTarget;

static EMPHASIS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("strong, b").expect("valid selector"));

/// URL of the first anchor whose text contains "faq".
#[must_use]
pub fn find_faq_page(doc: &ParsedDocument, target: &ScrapeTarget) -> Option<String> {
    let anchor = doc.first_anchor_with_text("faq")?;
    target.resolve(anchor.value().attr("href")?)
}

/// Fetches the FAQ page, if any, and extracts its entries. Fetch failures
/// yield no entries.
pub async fn scrape_faqs(fetcher: &Fetcher, faq_url: Option<&str>) -> Vec<FaqEntry> {
    let Some(url) = faq_url else {
        return Vec::new();
    };
    match fetcher.fetch_page(url).await {
        Ok(page) => extract_faq_entries(&page),
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "faq page fetch failed");
            Vec::new()
        }
    }
}

/// Every `<strong>`/`<b>` whose text ends in `?` and whose next element
/// sibling is a `<p>` becomes a question, with the paragraph as its answer.
/// Both texts have their whitespace collapsed.
#[must_use]
pub fn extract_faq_entries(page: &ParsedDocument) -> Vec<FaqEntry> {
    page.html()
        .select(&EMPHASIS)
        .filter_map(|emphasis| {
            let question = normalized_text(emphasis);
            if !question.ends_with('?') {
                return None;
            }
            let answer = next_element_sibling(emphasis)
                .filter(|sibling| sibling.value().name() == "p")?;
            Some(FaqEntry {
                question,
                answer: normalized_text(answer),
            })
        })
        .collect()
}

fn next_element_sibling(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faqs(body: &str) -> Vec<FaqEntry> {
        extract_faq_entries(&ParsedDocument::parse("https://shop.example/pages/faq", body))
    }

    #[test]
    fn pairs_questions_with_following_paragraph() {
        let entries = faqs(
            "<main>\
               <div><strong>Do you ship abroad?</strong>\n<p>Yes, to 20 countries.</p></div>\
               <div><b>How long is delivery?</b><p>3-5 <em>business</em> days.</p></div>\
             </main>",
        );
        assert_eq!(
            entries,
            vec![
                FaqEntry {
                    question: "Do you ship abroad?".to_string(),
                    answer: "Yes, to 20 countries.".to_string(),
                },
                FaqEntry {
                    question: "How long is delivery?".to_string(),
                    answer: "3-5 business days.".to_string(),
                },
            ]
        );
    }

    #[test]
    fn skips_emphasis_without_question_mark() {
        let entries = faqs("<div><strong>Shipping</strong><p>We ship daily.</p></div>");
        assert!(entries.is_empty());
    }

    #[test]
    fn skips_question_not_followed_by_paragraph() {
        let entries = faqs(
            "<div><strong>Can I return?</strong><div>Yes.</div></div>\
             <p><b>Inline question?</b></p>",
        );
        assert!(entries.is_empty());
    }

    #[test]
    fn find_faq_page_matches_anchor_text() {
        let target = ScrapeTarget::parse("https://shop.example").unwrap();
        let doc = ParsedDocument::parse(
            target.as_str(),
            r#"<a href="/pages/help">Help</a><a href="/pages/faqs">FAQs</a>"#,
        );
        assert_eq!(
            find_faq_page(&doc, &target).as_deref(),
            Some("https://shop.example/pages/faqs")
        );
    }
}
