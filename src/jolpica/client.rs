use std::time::Duration;

use anyhow::{Context, Result};
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::Retry;

use super::types::FetchError;

/// Base URL of the Jolpica API (the community continuation of Ergast)
pub const BASE_URL: &str = "https://api.jolpica.ca/ergast/f1";

/// Build the HTTP client shared by every request.
pub fn create_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(format!("f1p5/{}", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to create HTTP client")
}

/// GET `url` and return the body, retrying transient failures with
/// exponential backoff (100ms, 200ms, 400ms).
pub(crate) async fn fetch_body(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let retry_strategy = ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(5))
        .take(3);

    Retry::spawn(retry_strategy, || async {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })
    })
    .await
}
