//! Parsed HTML page plus the text and anchor helpers the extractors share.
//!
//! `scraper::Html` is not `Send`, so a [`ParsedDocument`] must never be held
//! across an `.await`. Extractors read what they need from it synchronously
//! and return owned values.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

/// Elements whose contents are never visible page text.
const NON_VISIBLE_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("valid selector"));

pub struct ParsedDocument {
    url: String,
    html: Html,
}

impl ParsedDocument {
    /// Parses `body` leniently. Broken markup never fails; it just yields
    /// whatever tree the HTML5 parser recovers.
    #[must_use]
    pub fn parse(url: &str, body: &str) -> Self {
        Self {
            url: url.to_owned(),
            html: Html::parse_document(body),
        }
    }

    #[must_use]
    pub fn html(&self) -> &Html {
        &self.html
    }

    pub fn anchors(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.select(&ANCHOR)
    }

    /// First anchor, in document order, whose visible text contains
    /// `keyword` (case-insensitive).
    #[must_use]
    pub fn first_anchor_with_text(&self, keyword: &str) -> Option<ElementRef<'_>> {
        let keyword = keyword.to_lowercase();
        self.anchors()
            .find(|a| element_text(*a, "").to_lowercase().contains(&keyword))
    }

    /// First anchor, in document order, whose `href` contains `fragment`
    /// (case-insensitive).
    #[must_use]
    pub fn first_anchor_with_href(&self, fragment: &str) -> Option<ElementRef<'_>> {
        let fragment = fragment.to_lowercase();
        self.anchors().find(|a| {
            a.value()
                .attr("href")
                .is_some_and(|href| href.to_lowercase().contains(&fragment))
        })
    }

    /// Every visible text node in the document, joined with `separator`.
    #[must_use]
    pub fn visible_text(&self, separator: &str) -> String {
        element_text(self.html.root_element(), separator)
    }

    /// Text of `<main>`, or `<body>` when there is no `<main>`. Text nodes are
    /// trimmed, blanks dropped, and the rest joined with newlines.
    #[must_use]
    pub fn main_text(&self) -> Option<String> {
        static MAIN: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse("main").expect("valid selector"));
        static BODY: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse("body").expect("valid selector"));

        let container = self
            .html
            .select(&MAIN)
            .next()
            .or_else(|| self.html.select(&BODY).next())?;
        Some(stripped_text(container, "\n"))
    }
}

impl std::fmt::Debug for ParsedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedDocument")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Raw visible text nodes under `element`, joined with `separator`.
#[must_use]
pub fn element_text(element: ElementRef<'_>, separator: &str) -> String {
    let mut parts = Vec::new();
    collect_text(element, &mut parts);
    parts.join(separator)
}

/// Visible text nodes under `element`, each trimmed, blanks dropped, joined
/// with `separator`.
#[must_use]
pub fn stripped_text(element: ElementRef<'_>, separator: &str) -> String {
    let mut parts = Vec::new();
    collect_text(element, &mut parts);
    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Visible text under `element` with every whitespace run collapsed to a
/// single space.
#[must_use]
pub fn normalized_text(element: ElementRef<'_>) -> String {
    element_text(element, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn collect_text<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push(&**text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !NON_VISIBLE_TAGS.contains(&child_element.value().name()) {
                collect_text(child_element, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> ParsedDocument {
        ParsedDocument::parse("https://shop.example", body)
    }

    #[test]
    fn visible_text_skips_scripts_and_styles() {
        let page = doc(
            "<html><head><style>.a{}</style></head><body><p>Hello</p>\
             <script>var x = 'hidden@example.com';</script><p>World</p></body></html>",
        );
        let text = page.visible_text(" ");
        assert!(text.contains("Hello"));
        assert!(text.contains("World"));
        assert!(!text.contains("hidden@example.com"));
        assert!(!text.contains(".a{}"));
    }

    #[test]
    fn first_anchor_with_text_ignores_case_and_nesting() {
        let page = doc(
            r#"<a href="/one">Shop</a><a href="/faq"><span>Read our </span><b>FAQs</b></a>"#,
        );
        let anchor = page.first_anchor_with_text("faq").expect("anchor");
        assert_eq!(anchor.value().attr("href"), Some("/faq"));
    }

    #[test]
    fn first_anchor_with_href_matches_fragment() {
        let page = doc(
            r#"<a href="/about">About</a><a href="https://WWW.Instagram.com/brand">IG</a>"#,
        );
        let anchor = page.first_anchor_with_href("instagram.com").expect("anchor");
        assert_eq!(anchor.value().attr("href"), Some("https://WWW.Instagram.com/brand"));
    }

    #[test]
    fn main_text_prefers_main_over_body() {
        let page = doc(
            "<body><nav>Menu</nav><main><h1> Privacy </h1>\n<p>We keep data safe.</p></main></body>",
        );
        assert_eq!(
            page.main_text().as_deref(),
            Some("Privacy\nWe keep data safe.")
        );
    }

    #[test]
    fn main_text_falls_back_to_body() {
        let page = doc("<body><div>  Refunds within 30 days. </div><div> </div></body>");
        assert_eq!(page.main_text().as_deref(), Some("Refunds within 30 days."));
    }

    #[test]
    fn malformed_markup_still_parses() {
        let page = doc("<div><p>unclosed <a href='/x'>link");
        assert_eq!(page.anchors().count(), 1);
        assert!(page.visible_text(" ").contains("unclosed"));
    }
}
