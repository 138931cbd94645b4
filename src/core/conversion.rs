//! Conversion requests and results

use crate::core::currency::Currency;
use crate::core::error::ConvertError;
use serde::Serialize;
use tracing::warn;

/// Amount used when the caller's input is not a positive finite number.
pub const DEFAULT_AMOUNT: f64 = 1.0;

/// Number of fractional digits shown for converted amounts.
pub const DEFAULT_PRECISION: usize = 6;

/// Parses a user supplied amount, accepting only positive finite numbers.
pub fn parse_amount(input: &str) -> Result<f64, ConvertError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| ConvertError::InvalidAmount(input.to_string()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

impl ConversionRequest {
    pub fn new(amount: f64, from: &str, to: &str) -> Self {
        let amount = if amount.is_finite() && amount > 0.0 {
            amount
        } else {
            warn!(amount, "Invalid amount, using {DEFAULT_AMOUNT}");
            DEFAULT_AMOUNT
        };
        ConversionRequest {
            amount,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Builds a request from raw input, falling back to [`DEFAULT_AMOUNT`] for bad amounts.
    pub fn from_input(amount: &str, from: &str, to: &str) -> Self {
        let amount = parse_amount(amount).unwrap_or_else(|e| {
            warn!(error = %e, "Using default amount {DEFAULT_AMOUNT}");
            DEFAULT_AMOUNT
        });
        Self::new(amount, from, to)
    }

    pub fn swapped(&self) -> Self {
        ConversionRequest {
            amount: self.amount,
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    pub amount: f64,
    pub from: Currency,
    pub to: Currency,
    /// Units of `to` per one unit of `from`.
    pub rate: f64,
    pub converted_amount: f64,
}

impl ConversionResult {
    pub fn new(amount: f64, from: Currency, to: Currency, rate: f64) -> Self {
        ConversionResult {
            amount,
            from,
            to,
            rate,
            converted_amount: amount * rate,
        }
    }

    /// Renders `"{amount} {from} = {converted} {to}"`, rounding only the converted amount.
    pub fn display(&self, precision: usize) -> String {
        format!(
            "{} {} = {:.*} {}",
            self.amount, self.from.label, precision, self.converted_amount, self.to.label
        )
    }
}
