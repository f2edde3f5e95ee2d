//! Per-resort orchestration: try each candidate URL in order until one
//! yields meaningful data.

use std::time::Duration;

use powdertrack_core::{MergedRecord, ResortConfig};
use serde::{Deserialize, Serialize};

use crate::extractor::Extractor;
use crate::fetch::PageClient;

/// How a resort's extraction attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeOutcome {
    /// Some candidate URL produced meaningful data.
    Succeeded,
    /// Every candidate was tried; the record is empty.
    Exhausted,
}

/// The result of one resort's extraction attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResortReport {
    pub resort: String,
    pub outcome: ScrapeOutcome,
    pub record: MergedRecord,
}

/// Scrapes one resort: fetch candidates in order, extract, and stop at the
/// first candidate whose record passes the meaningful-data test.
///
/// Fetch and parse failures are logged and skipped, never propagated; a
/// resort that yields nothing anywhere comes back as
/// [`ScrapeOutcome::Exhausted`] with an empty record pointing at the last
/// URL tried. A resort configured with no URLs at all is exhausted
/// immediately, with an empty `source_url`. Between candidates the loop
/// sleeps `candidate_delay` out of politeness to the origin.
pub async fn scrape_resort(
    client: &PageClient,
    resort: &ResortConfig,
    candidate_delay: Duration,
) -> ResortReport {
    let extractor = Extractor::for_resort(resort);
    let candidates = resort.candidate_urls();
    if candidates.is_empty() {
        tracing::warn!(resort = %resort.name, "no candidate URLs configured");
        return ResortReport {
            resort: resort.slug(),
            outcome: ScrapeOutcome::Exhausted,
            record: MergedRecord::empty(""),
        };
    }
    let mut last_url = "";

    for (index, url) in candidates.iter().enumerate() {
        last_url = url;
        let doc = match client.fetch_page(url).await {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(resort = %resort.name, url, error = %err, "candidate fetch failed");
                continue;
            }
        };

        let record = extractor.extract(&doc, url);
        drop(doc);
        if record.has_meaningful_data() {
            tracing::info!(
                resort = %resort.name,
                url,
                fields = record.fields.len(),
                "extraction succeeded"
            );
            return ResortReport {
                resort: resort.slug(),
                outcome: ScrapeOutcome::Succeeded,
                record,
            };
        }

        tracing::debug!(resort = %resort.name, url, "no meaningful data on candidate");
        if index + 1 < candidates.len() {
            tokio::time::sleep(candidate_delay).await;
        }
    }

    tracing::warn!(resort = %resort.name, "all candidate URLs exhausted");
    ResortReport {
        resort: resort.slug(),
        outcome: ScrapeOutcome::Exhausted,
        record: MergedRecord::empty(last_url),
    }
}
