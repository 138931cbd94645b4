//! Rate resolution across fiat and crypto currencies

use crate::core::conversion::{ConversionRequest, ConversionResult};
use crate::core::currency::{Currency, CurrencyKind, CurrencyTable};
use crate::core::error::ConvertError;
use crate::core::rate::{CryptoPriceProvider, FiatRateProvider};
use anyhow::{Result, anyhow};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Quote currency used to compose crypto to crypto rates.
pub const DEFAULT_REFERENCE_CURRENCY: &str = "usd";

/// Picks a lookup strategy from the kinds of the two currencies and resolves
/// a rate in units of `to` per one unit of `from`.
#[derive(Clone)]
pub struct RateResolver {
    currencies: Arc<CurrencyTable>,
    fiat_provider: Arc<dyn FiatRateProvider>,
    crypto_provider: Arc<dyn CryptoPriceProvider>,
    reference_currency: String,
}

fn usable(value: f64, what: impl Display) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(anyhow!("Unusable value {value} for {what}"))
    }
}

impl RateResolver {
    pub fn new(
        currencies: Arc<CurrencyTable>,
        fiat_provider: Arc<dyn FiatRateProvider>,
        crypto_provider: Arc<dyn CryptoPriceProvider>,
    ) -> Self {
        RateResolver {
            currencies,
            fiat_provider,
            crypto_provider,
            reference_currency: DEFAULT_REFERENCE_CURRENCY.to_string(),
        }
    }

    pub fn with_reference_currency(mut self, code: &str) -> Self {
        self.reference_currency = code.to_lowercase();
        self
    }

    pub fn currencies(&self) -> &CurrencyTable {
        &self.currencies
    }

    #[instrument(name = "ResolveRate", skip(self))]
    pub async fn resolve_rate(&self, from: &str, to: &str) -> Result<f64, ConvertError> {
        let from = self.currencies.classify(from)?;
        let to = self.currencies.classify(to)?;
        self.resolve_classified(&from, &to).await
    }

    pub async fn convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionResult, ConvertError> {
        let from = self.currencies.classify(&request.from)?;
        let to = self.currencies.classify(&request.to)?;
        let rate = self.resolve_classified(&from, &to).await?;
        Ok(ConversionResult::new(request.amount, from, to, rate))
    }

    async fn resolve_classified(&self, from: &Currency, to: &Currency) -> Result<f64, ConvertError> {
        if from.id == to.id {
            return Ok(1.0);
        }

        let rate = self
            .lookup(from, to)
            .await
            .and_then(|rate| usable(rate, format!("{} -> {}", from.id, to.id)))
            .map_err(|e| ConvertError::rate_unavailable(&from.id, &to.id, e))?;
        debug!(from = %from.id, to = %to.id, rate, "Resolved rate");
        Ok(rate)
    }

    async fn lookup(&self, from: &Currency, to: &Currency) -> Result<f64> {
        match (from.kind, to.kind) {
            (CurrencyKind::Fiat, CurrencyKind::Fiat) => {
                let rates = self.fiat_provider.latest_rates(&from.id).await?;
                rates
                    .get(&to.id)
                    .copied()
                    .ok_or_else(|| anyhow!("No {} rate in {} table", to.id, from.id))
            }
            // Providers only quote crypto priced in fiat, so invert.
            (CurrencyKind::Fiat, CurrencyKind::Crypto) => {
                let price = self.crypto_provider.price(&to.id, &from.id).await?;
                let price = usable(price, format!("{} in {}", to.id, from.id))?;
                Ok(1.0 / price)
            }
            (CurrencyKind::Crypto, CurrencyKind::Fiat) => {
                self.crypto_provider.price(&from.id, &to.id).await
            }
            (CurrencyKind::Crypto, CurrencyKind::Crypto) => {
                let reference = self.reference_currency.as_str();
                let (from_price, to_price) = futures::try_join!(
                    self.crypto_provider.price(&from.id, reference),
                    self.crypto_provider.price(&to.id, reference),
                )?;
                let from_price = usable(from_price, format!("{} in {reference}", from.id))?;
                let to_price = usable(to_price, format!("{} in {reference}", to.id))?;
                Ok(from_price * (1.0 / to_price))
            }
        }
    }
}
