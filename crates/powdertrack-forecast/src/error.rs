use thiserror::Error;

/// Errors from the forecast API client.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("failed to deserialize {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("resort '{resort}' has no coordinates in the registry")]
    MissingCoordinates { resort: String },

    #[error("invalid forecast base URL '{0}'")]
    InvalidBaseUrl(String),
}
