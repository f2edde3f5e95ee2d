//! Snow-forecast adapter for the GribStream weather API.
//!
//! Complements the page scraper with model-derived forecast data for
//! resorts that carry coordinates in the registry. Returns records in the
//! same canonical shape the scraper produces.

pub mod client;
pub mod error;
pub mod types;

pub use client::ForecastClient;
pub use error::ForecastError;
