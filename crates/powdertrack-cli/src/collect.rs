//! The `collect` subcommand: scrape conditions and write snapshots.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Args, ValueEnum};
use powdertrack_core::{load_resorts, AppConfig, MergedRecord, ResortConfig};
use powdertrack_scraper::{
    onthesnow, scrape_all_resorts, PageClient, ResortReport, ScrapeOutcome,
};

use crate::export;

/// Where condition pages are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    /// Each resort's own snow-report/website pages.
    Site,
    /// The OnTheSnow platform, for resorts with a configured slug.
    Onthesnow,
}

#[derive(Debug, Args)]
pub struct CollectArgs {
    /// Only resorts from these countries (comma-separated, case-insensitive).
    #[arg(long, value_delimiter = ',')]
    pub countries: Vec<String>,

    /// Only these resorts, by name or slug (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub resorts: Vec<String>,

    #[arg(long, value_enum, default_value_t = Source::Site)]
    pub source: Source,

    /// List what would be scraped without fetching anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Output directory for JSON/CSV snapshots.
    #[arg(long, default_value = "./data")]
    pub out: PathBuf,
}

pub async fn run(config: &AppConfig, args: &CollectArgs) -> anyhow::Result<()> {
    let registry = load_resorts(&config.resorts_path)?;
    let selected = filter_resorts(&registry.resorts, &args.countries, &args.resorts);
    anyhow::ensure!(!selected.is_empty(), "no resorts match the given filters");

    if args.dry_run {
        for resort in &selected {
            println!(
                "{} ({}) -> {}",
                resort.name,
                resort.country,
                resort.candidate_urls().join(", ")
            );
        }
        println!("{} resorts would be scraped", selected.len());
        return Ok(());
    }

    let client = PageClient::new(config.request_timeout_secs, &config.user_agent)?;
    let candidate_delay = Duration::from_millis(config.candidate_delay_ms);
    let resort_delay = Duration::from_millis(config.resort_delay_ms);

    let started = Instant::now();
    let reports = match args.source {
        Source::Site => {
            scrape_all_resorts(&client, &selected, candidate_delay, resort_delay).await
        }
        Source::Onthesnow => collect_onthesnow(&client, &selected, resort_delay).await,
    };

    let succeeded = reports
        .values()
        .filter(|r| r.outcome == ScrapeOutcome::Succeeded)
        .count();
    tracing::info!(
        total = reports.len(),
        succeeded,
        exhausted = reports.len() - succeeded,
        elapsed_secs = started.elapsed().as_secs(),
        "collection finished"
    );

    let (json_path, csv_path) = export::write_snapshots(&args.out, &reports)?;
    println!("wrote {} and {}", json_path.display(), csv_path.display());
    Ok(())
}

/// Scrapes via the OnTheSnow platform instead of resort sites. Resorts
/// without a configured slug are skipped with a warning.
async fn collect_onthesnow(
    client: &PageClient,
    resorts: &[ResortConfig],
    resort_delay: Duration,
) -> BTreeMap<String, ResortReport> {
    let mut reports = BTreeMap::new();

    for (index, resort) in resorts.iter().enumerate() {
        let Some(slug) = resort.onthesnow_slug.as_deref() else {
            tracing::warn!(resort = %resort.name, "no OnTheSnow slug configured, skipping");
            continue;
        };
        let url = format!("{}/{slug}/skireport", onthesnow::BASE_URL);

        let report = match onthesnow::fetch_ski_report(client, onthesnow::BASE_URL, slug).await {
            Ok(record) if record.has_meaningful_data() => ResortReport {
                resort: resort.slug(),
                outcome: ScrapeOutcome::Succeeded,
                record,
            },
            Ok(record) => ResortReport {
                resort: resort.slug(),
                outcome: ScrapeOutcome::Exhausted,
                record,
            },
            Err(err) => {
                tracing::warn!(resort = %resort.name, error = %err, "OnTheSnow fetch failed");
                ResortReport {
                    resort: resort.slug(),
                    outcome: ScrapeOutcome::Exhausted,
                    record: MergedRecord::empty(&url),
                }
            }
        };
        reports.insert(resort.slug(), report);

        if index + 1 < resorts.len() {
            tokio::time::sleep(resort_delay).await;
        }
    }

    reports
}

/// Applies the `--countries` and `--resorts` filters. Empty filters select
/// everything; resort filters match name or slug, case-insensitively.
pub(crate) fn filter_resorts(
    resorts: &[ResortConfig],
    countries: &[String],
    names: &[String],
) -> Vec<ResortConfig> {
    resorts
        .iter()
        .filter(|resort| {
            countries.is_empty()
                || countries
                    .iter()
                    .any(|c| c.eq_ignore_ascii_case(&resort.country))
        })
        .filter(|resort| {
            names.is_empty()
                || names.iter().any(|n| {
                    n.eq_ignore_ascii_case(&resort.name) || n.eq_ignore_ascii_case(&resort.slug())
                })
        })
        .cloned()
        .collect()
}
