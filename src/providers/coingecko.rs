use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::core::cache::Cache;
use crate::core::rate::CryptoPriceProvider;
use crate::providers::util::{get_json, http_client};

/// Crypto prices from a CoinGecko compatible `simple/price` endpoint.
pub struct CoinGeckoProvider {
    base_url: String,
    cache: Arc<Cache<String, f64>>,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str, cache: Arc<Cache<String, f64>>) -> Self {
        CoinGeckoProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
        }
    }
}

// { "bitcoin": { "usd": 65000.0 } }
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

#[async_trait]
impl CryptoPriceProvider for CoinGeckoProvider {
    #[instrument(name = "CryptoPriceFetch", skip(self), fields(id = %id, vs = %vs_currency))]
    async fn price(&self, id: &str, vs_currency: &str) -> Result<f64> {
        let vs = vs_currency.to_lowercase();
        let key = format!("{id}:{vs}");
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let url = reqwest::Url::parse_with_params(
            &format!("{}/simple/price", self.base_url),
            &[("ids", id), ("vs_currencies", vs.as_str())],
        )
        .with_context(|| format!("Invalid crypto provider URL: {}", self.base_url))?;
        debug!("Requesting crypto price from {}", url);

        let what = format!("price of {id} in {vs}");
        let client = http_client()?;
        let data: SimplePriceResponse = get_json(&client, url, &what).await?;

        let price = data
            .get(id)
            .and_then(|prices| prices.get(&vs))
            .copied()
            .ok_or_else(|| anyhow!("No price data found for {}", what))?;

        self.cache.put(key, price).await;
        Ok(price)
    }
}
