use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::core::cache::Cache;
use crate::core::rate::FiatRateProvider;
use crate::providers::util::{get_json, http_client};

/// Fiat rates from an ExchangeRate-API compatible service.
pub struct ExchangeRateProvider {
    base_url: String,
    api_key: Option<String>,
    cache: Arc<Cache<String, HashMap<String, f64>>>,
}

impl ExchangeRateProvider {
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        cache: Arc<Cache<String, HashMap<String, f64>>>,
    ) -> Self {
        ExchangeRateProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
            cache,
        }
    }

    fn latest_url(&self, base: &str) -> String {
        match &self.api_key {
            Some(key) => format!("{}/{}/latest/{}", self.base_url, key, base),
            None => format!("{}/latest/{}", self.base_url, base),
        }
    }
}

#[derive(Deserialize, Debug)]
struct LatestRatesResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(rename = "error-type", default)]
    error_type: Option<String>,
    #[serde(alias = "rates", default)]
    conversion_rates: Option<HashMap<String, f64>>,
}

#[async_trait]
impl FiatRateProvider for ExchangeRateProvider {
    #[instrument(name = "FiatRatesFetch", skip(self), fields(base = %base))]
    async fn latest_rates(&self, base: &str) -> Result<HashMap<String, f64>> {
        let base = base.to_uppercase();
        if let Some(cached) = self.cache.get(&base).await {
            return Ok(cached);
        }

        let what = format!("fiat rates of {base}");
        debug!("Requesting {}", what);

        let client = http_client()?;
        let data: LatestRatesResponse = get_json(&client, self.latest_url(&base), &what).await?;

        if data.result.as_deref() == Some("error") {
            return Err(anyhow!(
                "Provider error: {} for {}",
                data.error_type.as_deref().unwrap_or("unknown"),
                what
            ));
        }

        let rates = data
            .conversion_rates
            .filter(|rates| !rates.is_empty())
            .ok_or_else(|| anyhow!("No rate data found for {}", what))?;

        self.cache.put(base, rates.clone()).await;
        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(request_path: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_response = r#"{
            "result": "success",
            "base_code": "USD",
            "conversion_rates": { "USD": 1, "INR": 83.0, "EUR": 0.92 }
        }"#;
        let mock_server = create_mock_server("/latest/USD", 200, mock_response).await;
        let provider =
            ExchangeRateProvider::new(&mock_server.uri(), None, Arc::new(Cache::new()));

        let rates = provider.latest_rates("usd").await.unwrap();
        assert_eq!(rates.get("INR"), Some(&83.0));
        assert_eq!(rates.get("USD"), Some(&1.0));
    }

    #[tokio::test]
    async fn test_api_key_path_and_rates_alias() {
        let mock_response = r#"{ "result": "success", "rates": { "INR": 90.1 } }"#;
        let mock_server = create_mock_server("/secret/latest/EUR", 200, mock_response).await;
        let provider = ExchangeRateProvider::new(
            &format!("{}/", mock_server.uri()),
            Some("secret"),
            Arc::new(Cache::new()),
        );

        let rates = provider.latest_rates("EUR").await.unwrap();
        assert_eq!(rates.get("INR"), Some(&90.1));
    }

    #[tokio::test]
    async fn test_rates_are_cached() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest/USD"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{ "conversion_rates": { "INR": 83.0 } }"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider =
            ExchangeRateProvider::new(&mock_server.uri(), None, Arc::new(Cache::new()));
        provider.latest_rates("USD").await.unwrap();
        let rates = provider.latest_rates("USD").await.unwrap();
        assert_eq!(rates.get("INR"), Some(&83.0));
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = create_mock_server("/latest/USD", 500, "").await;
        let provider =
            ExchangeRateProvider::new(&mock_server.uri(), None, Arc::new(Cache::new()));

        let result = provider.latest_rates("USD").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for fiat rates of USD"
        );
    }

    #[tokio::test]
    async fn test_provider_reported_error() {
        let mock_response = r#"{ "result": "error", "error-type": "unsupported-code" }"#;
        let mock_server = create_mock_server("/latest/XYZ", 200, mock_response).await;
        let provider =
            ExchangeRateProvider::new(&mock_server.uri(), None, Arc::new(Cache::new()));

        let result = provider.latest_rates("XYZ").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Provider error: unsupported-code for fiat rates of XYZ"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = create_mock_server("/latest/USD", 200, "not json").await;
        let provider =
            ExchangeRateProvider::new(&mock_server.uri(), None, Arc::new(Cache::new()));

        let result = provider.latest_rates("USD").await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for fiat rates of USD")
        );
    }

    #[tokio::test]
    async fn test_missing_rates_table() {
        let mock_server =
            create_mock_server("/latest/USD", 200, r#"{ "result": "success" }"#).await;
        let provider =
            ExchangeRateProvider::new(&mock_server.uri(), None, Arc::new(Cache::new()));

        let result = provider.latest_rates("USD").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No rate data found for fiat rates of USD"
        );
    }
}
