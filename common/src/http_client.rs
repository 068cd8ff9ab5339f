use crate::errors::AppError;
use reqwest::Client;
use reqwest::header::HeaderMap;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// HTTP client with a per-request timeout.
///
/// Every call is a single attempt: failures are surfaced immediately and
/// never retried.
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout_secs: u64) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::upstream(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Fetch JSON from URL with no extra headers.
    pub async fn get_json<T>(&self, url: &str) -> Result<T, AppError>
    where
        T: serde::de::DeserializeOwned,
    {
        self.get_json_with_headers(url, HeaderMap::new()).await
    }

    /// Fetch JSON from URL, sending the given headers along.
    #[instrument(skip(self, url, headers), fields(endpoint = %strip_query(url)))]
    pub async fn get_json_with_headers<T>(&self, url: &str, headers: HeaderMap) -> Result<T, AppError>
    where
        T: serde::de::DeserializeOwned,
    {
        let endpoint = strip_query(url);

        let response = tokio::time::timeout(self.timeout, self.client.get(url).headers(headers).send())
            .await
            .map_err(|_| AppError::upstream(format!("Request to {} timed out", endpoint)))??;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %endpoint, status = status.as_u16(), "Upstream returned error status");
            return Err(AppError::upstream(format!(
                "HTTP error: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )));
        }

        let text = response.text().await?;
        let json: T = serde_json::from_str(&text)?;

        info!(endpoint = %endpoint, "Request successful");
        Ok(json)
    }
}

/// Query strings may carry API keys, so only the path part is logged.
fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}
