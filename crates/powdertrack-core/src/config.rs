use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("POWDERTRACK_ENV", "development"));
    let log_level = or_default("POWDERTRACK_LOG_LEVEL", "info");
    let resorts_path = PathBuf::from(or_default(
        "POWDERTRACK_RESORTS_PATH",
        "./config/resorts.yaml",
    ));

    let request_timeout_secs = parse_u64("POWDERTRACK_REQUEST_TIMEOUT_SECS", "10")?;
    let user_agent = or_default(
        "POWDERTRACK_USER_AGENT",
        "powdertrack/0.1 (snow-conditions)",
    );
    let candidate_delay_ms = parse_u64("POWDERTRACK_CANDIDATE_DELAY_MS", "1000")?;
    let resort_delay_ms = parse_u64("POWDERTRACK_RESORT_DELAY_MS", "2000")?;

    let forecast_api_key = lookup("POWDERTRACK_FORECAST_API_KEY").ok();
    let forecast_base_url = or_default(
        "POWDERTRACK_FORECAST_BASE_URL",
        "https://gribstream.com/api/v2",
    );

    Ok(AppConfig {
        env,
        log_level,
        resorts_path,
        request_timeout_secs,
        user_agent,
        candidate_delay_ms,
        resort_delay_ms,
        forecast_api_key,
        forecast_base_url,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
