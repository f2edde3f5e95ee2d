//! Request/response types for the GribStream forecast endpoints.

use serde::{Deserialize, Serialize};

/// POST body for `{model}/forecasts`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    pub forecasted_from: String,
    pub forecasted_until: String,
    pub coordinates: Vec<Coordinate>,
    pub variables: Vec<VariableSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
}

/// One requested model variable with the alias it comes back under.
#[derive(Debug, Clone, Serialize)]
pub struct VariableSpec {
    pub name: &'static str,
    pub level: &'static str,
    pub alias: &'static str,
}

/// The variables requested for every forecast: accumulated snowfall, snow
/// depth, precipitation, 2 m temperature, and the categorical-snow flag.
#[must_use]
pub fn requested_variables() -> Vec<VariableSpec> {
    vec![
        VariableSpec {
            name: "ASNOW",
            level: "surface",
            alias: "snow_accum",
        },
        VariableSpec {
            name: "SNOD",
            level: "surface",
            alias: "snow_depth",
        },
        VariableSpec {
            name: "APCP",
            level: "surface",
            alias: "precip",
        },
        VariableSpec {
            name: "TMP",
            level: "2 m above ground",
            alias: "temp",
        },
        VariableSpec {
            name: "CSNOW",
            level: "surface",
            alias: "is_snow",
        },
    ]
}

/// Response envelope: a time series of forecast points.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub data: Vec<ForecastPoint>,
}

/// One hourly point in the forecast time series. Units are the raw model
/// units: kg/m² for water equivalents, meters for depth, Kelvin for
/// temperature.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastPoint {
    #[serde(default)]
    pub snow_accum: Option<f64>,
    #[serde(default)]
    pub snow_depth: Option<f64>,
    #[serde(default)]
    pub precip: Option<f64>,
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub is_snow: Option<f64>,
}
