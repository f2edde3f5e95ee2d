use std::time::Duration;

use reqwest::Client;

use crate::document::Document;
use crate::error::ScrapeError;

/// HTTP client for fetching resort condition pages.
///
/// One instance is shared across a whole batch run. Non-2xx responses and
/// unparseable bodies come back as typed errors; the orchestrator treats
/// both as "try the next candidate URL".
pub struct PageClient {
    client: Client,
}

impl PageClient {
    /// Creates a `PageClient` with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches one page and parses it into a [`Document`].
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::HttpStatus`] for non-2xx responses,
    /// [`ScrapeError::Http`] for transport failures, and
    /// [`ScrapeError::MalformedDocument`] when the body parses to nothing
    /// usable.
    pub async fn fetch_page(&self, url: &str) -> Result<Document, ScrapeError> {
        tracing::debug!(url, "fetching page");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        Document::parse(&body, url)
    }
}
