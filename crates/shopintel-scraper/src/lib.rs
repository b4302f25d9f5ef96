pub mod document;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod scrape;
pub mod target;

pub use document::ParsedDocument;
pub use error::ScrapeError;
pub use fetch::Fetcher;
pub use scrape::{BrandScraper, Scrape};
pub use target::ScrapeTarget;
