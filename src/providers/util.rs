use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("cconv/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// Issues a GET and parses the body as JSON. Non-success statuses are errors.
///
/// `what` names the request in error messages; the URL is not included since
/// it may carry an API key.
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: impl reqwest::IntoUrl,
    what: &str,
) -> Result<T> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| anyhow!("Request error: {} for {}", e.without_url(), what))?;

    debug!(status = %response.status(), "Received response for {}", what);

    if !response.status().is_success() {
        return Err(anyhow!("HTTP error: {} for {}", response.status(), what));
    }

    let text = response
        .text()
        .await
        .with_context(|| format!("Failed to read response body for {what}"))?;

    serde_json::from_str(&text)
        .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", what, e))
}
