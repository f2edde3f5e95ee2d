//! HTTP client for the GribStream forecast API.
//!
//! Asks the high-resolution HRRR model first (US coverage only) and falls
//! back to the global GFS model when HRRR answers non-2xx for the given
//! coordinates. The hourly time series comes back in raw model units and
//! is folded into a canonical [`MergedRecord`] here.

use std::time::Duration;

use chrono::{DurationRound, TimeDelta, Utc};
use powdertrack_core::{FieldKey, MergedRecord, PartialRecord, ResortConfig};
use reqwest::{Client, Url};

use crate::error::ForecastError;
use crate::types::{requested_variables, Coordinate, ForecastRequest, ForecastResponse};

const DEFAULT_BASE_URL: &str = "https://gribstream.com/api/v2";

/// Forecast window length in hours.
const WINDOW_HOURS: i64 = 48;

/// Models to try, in order. HRRR covers the continental US at high
/// resolution; GFS covers the globe.
const MODELS: [&str; 2] = ["hrrr", "gfs"];

/// Client for the GribStream forecast API.
///
/// Use [`ForecastClient::new`] for production or
/// [`ForecastClient::with_base_url`] to point at a mock server in tests.
pub struct ForecastClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl ForecastClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ForecastError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ForecastError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ForecastError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| ForecastError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Fetches a 48-hour snow forecast for one resort.
    ///
    /// # Errors
    ///
    /// - [`ForecastError::MissingCoordinates`] when the registry entry has
    ///   no latitude/longitude; nothing is fetched.
    /// - [`ForecastError::HttpStatus`] when every model answers non-2xx.
    /// - [`ForecastError::Http`] / [`ForecastError::Deserialize`] on
    ///   transport or response-shape failures.
    pub async fn snow_forecast(&self, resort: &ResortConfig) -> Result<MergedRecord, ForecastError> {
        let (lat, lon) = resort
            .coordinates()
            .ok_or_else(|| ForecastError::MissingCoordinates {
                resort: resort.name.clone(),
            })?;

        let request = build_request(&resort.name, lat, lon);
        let mut last_status: Option<(u16, String)> = None;

        for model in MODELS {
            let url = self
                .base_url
                .join(&format!("{model}/forecasts"))
                .map_err(|_| ForecastError::InvalidBaseUrl(self.base_url.to_string()))?;

            tracing::debug!(resort = %resort.name, model, "requesting forecast");
            let response = self
                .client
                .post(url.clone())
                .header(
                    reqwest::header::AUTHORIZATION,
                    format!("Bearer {}", self.api_key),
                )
                .json(&request)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                tracing::info!(
                    resort = %resort.name,
                    model,
                    status = status.as_u16(),
                    "model unavailable, trying next"
                );
                last_status = Some((status.as_u16(), url.to_string()));
                continue;
            }

            let body = response.text().await?;
            let parsed: ForecastResponse =
                serde_json::from_str(&body).map_err(|e| ForecastError::Deserialize {
                    context: format!("{model} forecast for '{}'", resort.name),
                    source: e,
                })?;
            return Ok(fold_series(&parsed, url.as_str()));
        }

        let (status, url) = last_status.unwrap_or((0, self.base_url.to_string()));
        Err(ForecastError::HttpStatus { status, url })
    }
}

fn build_request(name: &str, lat: f64, lon: f64) -> ForecastRequest {
    let now = Utc::now();
    let from = now.duration_trunc(TimeDelta::hours(1)).unwrap_or(now);
    let until = from + TimeDelta::hours(WINDOW_HOURS);

    ForecastRequest {
        forecasted_from: from.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        forecasted_until: until.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        coordinates: vec![Coordinate {
            lat,
            lon,
            name: name.to_owned(),
        }],
        variables: requested_variables(),
    }
}

/// Folds the hourly time series into a canonical record.
///
/// The newest point supplies instantaneous values: snow depth (m → cm),
/// temperature (K → °C, one decimal), and fresh snowfall from accumulated
/// snow or, when the point reads as snowing, from precipitation (kg/m² of
/// water ≈ mm, times ten for the snow ratio). Accumulated snowfall summed
/// over the whole series becomes the 48-hour total.
fn fold_series(response: &ForecastResponse, url: &str) -> MergedRecord {
    let mut out = PartialRecord::new();

    if let Some(latest) = response.data.last() {
        if let Some(accum) = latest.snow_accum {
            out.set_if_absent(FieldKey::NewSnow24hCm, (accum * 10.0).floor());
        }
        if let Some(depth_m) = latest.snow_depth {
            out.set_if_absent(FieldKey::BaseDepthCm, (depth_m * 100.0).floor());
        }
        if let Some(precip) = latest.precip {
            let snowing = latest.is_snow.unwrap_or(0.0) > 0.0
                || latest.temp.is_some_and(|k| k < 273.15);
            if snowing {
                out.set_if_absent(FieldKey::NewSnow24hCm, (precip * 10.0).floor());
            }
        }
        if let Some(kelvin) = latest.temp {
            let celsius = ((kelvin - 273.15) * 10.0).round() / 10.0;
            out.set_if_absent(FieldKey::TemperatureBaseC, celsius);
        }
    }

    if response.data.len() > 1 {
        let total: f64 = response
            .data
            .iter()
            .filter_map(|point| point.snow_accum)
            .sum();
        out.set_if_absent(FieldKey::NewSnow48hCm, (total * 10.0).floor());
    }

    MergedRecord::from_partial(out, url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ForecastPoint;

    fn response(points: Vec<ForecastPoint>) -> ForecastResponse {
        ForecastResponse { data: points }
    }

    #[test]
    fn fold_converts_model_units() {
        let record = fold_series(
            &response(vec![ForecastPoint {
                snow_accum: Some(1.2),
                snow_depth: Some(0.8),
                temp: Some(265.55),
                ..ForecastPoint::default()
            }]),
            "https://example.com/hrrr/forecasts",
        );
        assert_eq!(record.get(FieldKey::NewSnow24hCm), Some(12.0));
        assert_eq!(record.get(FieldKey::BaseDepthCm), Some(80.0));
        assert_eq!(record.get(FieldKey::TemperatureBaseC), Some(-7.6));
    }

    #[test]
    fn fold_sums_series_into_48h_total() {
        let points = vec![
            ForecastPoint {
                snow_accum: Some(0.5),
                ..ForecastPoint::default()
            },
            ForecastPoint {
                snow_accum: Some(1.2),
                ..ForecastPoint::default()
            },
        ];
        let record = fold_series(&response(points), "https://example.com/hrrr/forecasts");
        assert_eq!(record.get(FieldKey::NewSnow48hCm), Some(17.0));
    }

    #[test]
    fn precipitation_counts_as_snow_only_below_freezing_or_flagged() {
        let rain = fold_series(
            &response(vec![ForecastPoint {
                precip: Some(2.0),
                temp: Some(280.0),
                is_snow: Some(0.0),
                ..ForecastPoint::default()
            }]),
            "https://example.com/gfs/forecasts",
        );
        assert_eq!(rain.get(FieldKey::NewSnow24hCm), None);

        let snow = fold_series(
            &response(vec![ForecastPoint {
                precip: Some(2.0),
                temp: Some(270.0),
                ..ForecastPoint::default()
            }]),
            "https://example.com/gfs/forecasts",
        );
        assert_eq!(snow.get(FieldKey::NewSnow24hCm), Some(20.0));
    }

    #[test]
    fn empty_series_yields_empty_record() {
        let record = fold_series(&response(vec![]), "https://example.com/hrrr/forecasts");
        assert!(record.fields.is_empty());
    }

    #[test]
    fn out_of_bound_forecast_depth_is_dropped() {
        let record = fold_series(
            &response(vec![ForecastPoint {
                snow_depth: Some(25.0), // 2500 cm, implausible
                ..ForecastPoint::default()
            }]),
            "https://example.com/hrrr/forecasts",
        );
        assert_eq!(record.get(FieldKey::BaseDepthCm), None);
    }
}
