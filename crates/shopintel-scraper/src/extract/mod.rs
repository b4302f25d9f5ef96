//! Individual field extractors. Each works on a [`crate::ParsedDocument`] or
//! a fetched follow-up page and degrades to an empty value on failure.

pub mod catalog;
pub mod contact;
pub mod faq;
pub mod hero;
pub mod linked_page;
pub mod links;
pub mod social;

pub use catalog::{fetch_catalog, parse_catalog};
pub use contact::{contact_details_from_text, extract_contact_details};
pub use faq::{extract_faq_entries, find_faq_page, scrape_faqs};
pub use hero::{find_hero_products, MAX_HERO_PRODUCTS};
pub use linked_page::{
    find_linked_pages, page_text, read_first_linked_page, CONTEXT_KEYWORDS, PRIVACY_KEYWORDS,
    REFUND_KEYWORDS,
};
pub use links::extract_important_links;
pub use social::extract_social_handles;
