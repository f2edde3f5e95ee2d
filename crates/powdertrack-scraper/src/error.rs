use thiserror::Error;

/// Errors from fetching or parsing one candidate page.
///
/// None of these are fatal to a batch run: the orchestrator treats every
/// variant as "skip this candidate URL and move on".
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("malformed document from {url}: {reason}")]
    MalformedDocument { url: String, reason: String },
}
