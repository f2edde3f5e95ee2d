use clap::{Parser, Subcommand};
use powdertrack_core::{load_app_config, load_resorts, AppConfig};
use tracing_subscriber::EnvFilter;

mod collect;
mod export;
mod forecast;

#[derive(Debug, Parser)]
#[command(name = "powdertrack")]
#[command(about = "Ski resort snow conditions collector")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape current conditions for the configured resorts and write
    /// JSON/CSV snapshots.
    Collect(collect::CollectArgs),
    /// Fetch model snow forecasts for resorts with coordinates.
    Forecast(forecast::ForecastArgs),
    /// List the resort registry.
    Resorts,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_app_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();
    tracing::debug!(?config, "configuration loaded");

    let cli = Cli::parse();
    match cli.command {
        Commands::Collect(args) => collect::run(&config, &args).await,
        Commands::Forecast(args) => forecast::run(&config, &args).await,
        Commands::Resorts => list_resorts(&config),
    }
}

fn list_resorts(config: &AppConfig) -> anyhow::Result<()> {
    let registry = load_resorts(&config.resorts_path)?;
    for resort in &registry.resorts {
        println!(
            "{:<24} {:<14} {:<16} {}",
            resort.slug(),
            resort.country,
            resort.family.as_deref().unwrap_or("-"),
            resort.candidate_urls().join(" ")
        );
    }
    println!("{} resorts configured", registry.resorts.len());
    Ok(())
}
