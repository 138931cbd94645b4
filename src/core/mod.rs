//! Core conversion logic and abstractions

pub mod cache;
pub mod config;
pub mod conversion;
pub mod currency;
pub mod error;
pub mod log;
pub mod rate;
pub mod resolver;
pub mod session;

// Re-export main types for cleaner imports
pub use conversion::{ConversionRequest, ConversionResult};
pub use currency::{CryptoAsset, Currency, CurrencyKind, CurrencyTable};
pub use error::ConvertError;
pub use rate::{CryptoPriceProvider, FiatRateProvider};
pub use resolver::RateResolver;
pub use session::{ConversionSession, RequestKey};
