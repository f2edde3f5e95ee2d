//! Batch runner: scrapes a whole resort registry sequentially.

use std::collections::BTreeMap;
use std::time::Duration;

use powdertrack_core::ResortConfig;

use crate::fetch::PageClient;
use crate::report::{scrape_resort, ResortReport, ScrapeOutcome};

/// Scrapes every resort in order and collects reports keyed by resort slug.
///
/// Resorts are processed strictly sequentially with `resort_delay` between
/// them; one resort's failure never affects the next. The returned map
/// always has one entry per input resort.
pub async fn scrape_all_resorts(
    client: &PageClient,
    resorts: &[ResortConfig],
    candidate_delay: Duration,
    resort_delay: Duration,
) -> BTreeMap<String, ResortReport> {
    let total = resorts.len();
    let mut reports = BTreeMap::new();

    for (index, resort) in resorts.iter().enumerate() {
        tracing::info!(resort = %resort.name, position = index + 1, total, "processing resort");
        let report = scrape_resort(client, resort, candidate_delay).await;
        reports.insert(resort.slug(), report);
        if index + 1 < total {
            tokio::time::sleep(resort_delay).await;
        }
    }

    let succeeded = reports
        .values()
        .filter(|r| r.outcome == ScrapeOutcome::Succeeded)
        .count();
    tracing::info!(total, succeeded, "batch run complete");
    reports
}
