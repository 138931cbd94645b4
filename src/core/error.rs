//! Error taxonomy for rate resolution and conversion

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// The amount given by the caller is not a positive finite number.
    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),

    /// The identifier is neither a known fiat code nor a known crypto asset.
    #[error("Unknown currency: '{0}'")]
    UnknownCurrency(String),

    /// Any upstream failure while resolving a rate.
    #[error("Unable to fetch exchange rate for {from} -> {to}")]
    RateUnavailable {
        from: String,
        to: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ConvertError {
    pub fn rate_unavailable(from: &str, to: &str, source: anyhow::Error) -> Self {
        ConvertError::RateUnavailable {
            from: from.to_string(),
            to: to.to_string(),
            source,
        }
    }
}
