//! Rate provider abstractions

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Source of fiat exchange rates.
#[async_trait]
pub trait FiatRateProvider: Send + Sync {
    /// Returns the rate of every supported fiat code relative to one unit of `base`.
    async fn latest_rates(&self, base: &str) -> Result<HashMap<String, f64>>;
}

/// Source of crypto asset prices.
#[async_trait]
pub trait CryptoPriceProvider: Send + Sync {
    /// Returns the price of one unit of crypto asset `id` expressed in `vs_currency`.
    async fn price(&self, id: &str, vs_currency: &str) -> Result<f64>;
}
