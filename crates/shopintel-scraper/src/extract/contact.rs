//! Email addresses and phone numbers found in homepage text.

use std::sync::LazyLock;

use regex::Regex;
use shopintel_core::ContactDetails;

use crate::document::ParsedDocument;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid regex")
});

/// Indian mobile numbers: optional `+91` with one separator, optional
/// leading `0`, then ten digits starting 7, 8 or 9.
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\+91[\-\s]?)?[0]?[789]\d{9}").expect("valid regex"));

#[must_use]
pub fn extract_contact_details(doc: &ParsedDocument) -> ContactDetails {
    contact_details_from_text(&doc.visible_text(" "))
}

/// Unique full matches of the email and phone patterns in `text`.
#[must_use]
pub fn contact_details_from_text(text: &str) -> ContactDetails {
    ContactDetails {
        emails: EMAIL.find_iter(text).map(|m| m.as_str().to_owned()).collect(),
        phones: PHONE.find_iter(text).map(|m| m.as_str().to_owned()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_unique_emails() {
        let details = contact_details_from_text(
            "Write to support@memy.co.in or care@memy.co.in. Again: support@memy.co.in",
        );
        assert_eq!(details.emails.len(), 2);
        assert!(details.emails.contains("support@memy.co.in"));
        assert!(details.emails.contains("care@memy.co.in"));
    }

    #[test]
    fn records_full_phone_match_including_prefix() {
        let details = contact_details_from_text("Call +91 9876543210 or 08123456789 today");
        assert!(details.phones.contains("+91 9876543210"), "{:?}", details.phones);
        assert!(details.phones.contains("08123456789"), "{:?}", details.phones);
    }

    #[test]
    fn ignores_numbers_outside_the_mobile_range() {
        let details = contact_details_from_text("Order 1234567890 shipped");
        assert!(details.phones.is_empty());
    }

    #[test]
    fn text_without_contacts_is_empty() {
        let details = contact_details_from_text("Free shipping on all orders");
        assert_eq!(details, ContactDetails::default());
    }

    #[test]
    fn script_contents_are_not_scanned() {
        let doc = ParsedDocument::parse(
            "https://shop.example",
            "<body><p>hello@shop.example</p><script>x='tracking@vendor.example'</script></body>",
        );
        let details = extract_contact_details(&doc);
        assert_eq!(details.emails.len(), 1);
        assert!(details.emails.contains("hello@shop.example"));
    }
}
