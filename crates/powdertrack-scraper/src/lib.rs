pub mod document;
pub mod error;
pub mod extract;
pub mod extractor;
pub mod fetch;
pub mod onthesnow;
pub mod report;
pub mod runner;
pub mod units;

pub use document::Document;
pub use error::ScrapeError;
pub use extract::extract_generic;
pub use extractor::Extractor;
pub use fetch::PageClient;
pub use report::{scrape_resort, ResortReport, ScrapeOutcome};
pub use runner::scrape_all_resorts;
