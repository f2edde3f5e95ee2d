//! The `forecast` subcommand: model forecasts for resorts with coordinates.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use powdertrack_core::{load_resorts, AppConfig, MergedRecord};
use powdertrack_forecast::{ForecastClient, ForecastError};

use crate::collect::filter_resorts;

#[derive(Debug, Args)]
pub struct ForecastArgs {
    /// Only resorts from these countries (comma-separated, case-insensitive).
    #[arg(long, value_delimiter = ',')]
    pub countries: Vec<String>,

    /// Only these resorts, by name or slug (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub resorts: Vec<String>,

    /// Output directory for the JSON snapshot.
    #[arg(long, default_value = "./data")]
    pub out: PathBuf,
}

pub async fn run(config: &AppConfig, args: &ForecastArgs) -> anyhow::Result<()> {
    let api_key = config
        .forecast_api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("POWDERTRACK_FORECAST_API_KEY is not set"))?;

    let registry = load_resorts(&config.resorts_path)?;
    let selected = filter_resorts(&registry.resorts, &args.countries, &args.resorts);
    anyhow::ensure!(!selected.is_empty(), "no resorts match the given filters");

    let client = ForecastClient::with_base_url(
        api_key,
        config.request_timeout_secs,
        &config.forecast_base_url,
    )?;
    let resort_delay = Duration::from_millis(config.resort_delay_ms);

    let mut records: BTreeMap<String, MergedRecord> = BTreeMap::new();
    for (index, resort) in selected.iter().enumerate() {
        match client.snow_forecast(resort).await {
            Ok(record) => {
                tracing::info!(
                    resort = %resort.name,
                    fields = record.fields.len(),
                    "forecast fetched"
                );
                records.insert(resort.slug(), record);
            }
            Err(ForecastError::MissingCoordinates { .. }) => {
                tracing::warn!(resort = %resort.name, "no coordinates, skipping forecast");
            }
            Err(err) => {
                tracing::warn!(resort = %resort.name, error = %err, "forecast fetch failed");
            }
        }
        if index + 1 < selected.len() {
            tokio::time::sleep(resort_delay).await;
        }
    }

    tracing::info!(
        total = selected.len(),
        fetched = records.len(),
        "forecast run finished"
    );

    std::fs::create_dir_all(&args.out)?;
    let path = args.out.join(format!(
        "forecast_data_{}.json",
        chrono::Utc::now().format("%Y-%m-%d")
    ));
    std::fs::write(&path, serde_json::to_string_pretty(&records)?)?;
    println!("wrote {}", path.display());
    Ok(())
}
