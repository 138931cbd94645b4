//! Currency reference data and classification

use crate::core::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Fiat code to ISO country code, used for display and classification.
const FIAT_COUNTRIES: &[(&str, &str)] = &[
    ("AED", "AE"),
    ("ARS", "AR"),
    ("AUD", "AU"),
    ("BDT", "BD"),
    ("BGN", "BG"),
    ("BHD", "BH"),
    ("BRL", "BR"),
    ("CAD", "CA"),
    ("CHF", "CH"),
    ("CLP", "CL"),
    ("CNY", "CN"),
    ("COP", "CO"),
    ("CZK", "CZ"),
    ("DKK", "DK"),
    ("EGP", "EG"),
    ("EUR", "FR"),
    ("GBP", "GB"),
    ("GHS", "GH"),
    ("HKD", "HK"),
    ("HUF", "HU"),
    ("IDR", "ID"),
    ("ILS", "IL"),
    ("INR", "IN"),
    ("ISK", "IS"),
    ("JPY", "JP"),
    ("KES", "KE"),
    ("KRW", "KR"),
    ("KWD", "KW"),
    ("LKR", "LK"),
    ("MAD", "MA"),
    ("MXN", "MX"),
    ("MYR", "MY"),
    ("NGN", "NG"),
    ("NOK", "NO"),
    ("NPR", "NP"),
    ("NZD", "NZ"),
    ("OMR", "OM"),
    ("PEN", "PE"),
    ("PHP", "PH"),
    ("PKR", "PK"),
    ("PLN", "PL"),
    ("QAR", "QA"),
    ("RON", "RO"),
    ("SAR", "SA"),
    ("SEK", "SE"),
    ("SGD", "SG"),
    ("THB", "TH"),
    ("TRY", "TR"),
    ("TWD", "TW"),
    ("UAH", "UA"),
    ("USD", "US"),
    ("VND", "VN"),
    ("ZAR", "ZA"),
];

/// Crypto asset ids in the pricing provider's namespace with their ticker symbols.
const CRYPTO_ASSETS: &[(&str, &str)] = &[
    ("bitcoin", "btc"),
    ("ethereum", "eth"),
    ("tether", "usdt"),
    ("binancecoin", "bnb"),
    ("solana", "sol"),
    ("ripple", "xrp"),
    ("usd-coin", "usdc"),
    ("cardano", "ada"),
    ("dogecoin", "doge"),
    ("tron", "trx"),
    ("polkadot", "dot"),
    ("litecoin", "ltc"),
    ("chainlink", "link"),
    ("stellar", "xlm"),
    ("monero", "xmr"),
    ("avalanche-2", "avax"),
    ("shiba-inu", "shib"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyKind {
    Fiat,
    Crypto,
}

impl Display for CurrencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CurrencyKind::Fiat => "fiat",
                CurrencyKind::Crypto => "crypto",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoAsset {
    pub id: String,
    pub symbol: String,
}

/// A classified currency identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Currency {
    /// Canonical identifier: upper-case fiat code or lower-case crypto id.
    pub id: String,
    pub kind: CurrencyKind,
    /// Display text: the fiat code or the upper-case crypto symbol.
    pub label: String,
}

impl Currency {
    pub fn is_fiat(&self) -> bool {
        self.kind == CurrencyKind::Fiat
    }

    pub fn is_crypto(&self) -> bool {
        self.kind == CurrencyKind::Crypto
    }
}

/// Static reference tables for fiat codes and crypto assets.
#[derive(Debug, Clone)]
pub struct CurrencyTable {
    fiat: BTreeMap<String, String>,
    crypto: Vec<CryptoAsset>,
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CurrencyTable {
    pub fn builtin() -> Self {
        CurrencyTable {
            fiat: FIAT_COUNTRIES
                .iter()
                .map(|(code, country)| (code.to_string(), country.to_string()))
                .collect(),
            crypto: CRYPTO_ASSETS
                .iter()
                .map(|(id, symbol)| CryptoAsset {
                    id: id.to_string(),
                    symbol: symbol.to_string(),
                })
                .collect(),
        }
    }

    /// Adds crypto assets, skipping ids already known and ids that collide with fiat codes.
    pub fn with_crypto(mut self, extra: impl IntoIterator<Item = CryptoAsset>) -> Self {
        for asset in extra {
            let id = asset.id.trim().to_lowercase();
            if id.is_empty() || self.fiat.contains_key(&id.to_uppercase()) {
                continue;
            }
            if self.crypto.iter().any(|c| c.id == id) {
                continue;
            }
            self.crypto.push(CryptoAsset {
                id,
                symbol: asset.symbol.trim().to_lowercase(),
            });
        }
        self
    }

    pub fn fiat(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fiat.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn crypto(&self) -> &[CryptoAsset] {
        &self.crypto
    }

    pub fn is_fiat(&self, id: &str) -> bool {
        self.fiat.contains_key(&id.trim().to_uppercase())
    }

    pub fn is_crypto(&self, id: &str) -> bool {
        !self.is_fiat(id) && self.find_crypto(id).is_some()
    }

    fn find_crypto(&self, id: &str) -> Option<&CryptoAsset> {
        let needle = id.trim().to_lowercase();
        self.crypto
            .iter()
            .find(|c| c.id == needle)
            .or_else(|| self.crypto.iter().find(|c| c.symbol == needle))
    }

    /// Classifies an identifier. Fiat codes take precedence over crypto ticker symbols.
    pub fn classify(&self, id: &str) -> Result<Currency, ConvertError> {
        let code = id.trim().to_uppercase();
        if self.fiat.contains_key(&code) {
            return Ok(Currency {
                id: code.clone(),
                kind: CurrencyKind::Fiat,
                label: code,
            });
        }

        self.find_crypto(id)
            .map(|asset| Currency {
                id: asset.id.clone(),
                kind: CurrencyKind::Crypto,
                label: asset.symbol.to_uppercase(),
            })
            .ok_or_else(|| ConvertError::UnknownCurrency(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_fiat_is_case_insensitive() {
        let table = CurrencyTable::builtin();
        let usd = table.classify("usd").unwrap();
        assert_eq!(usd.id, "USD");
        assert_eq!(usd.kind, CurrencyKind::Fiat);
        assert_eq!(usd.label, "USD");
        assert!(table.is_fiat("Inr"));
        assert!(!table.is_crypto("INR"));
    }

    #[test]
    fn test_classify_crypto_by_id_and_symbol() {
        let table = CurrencyTable::builtin();
        let by_id = table.classify("Bitcoin").unwrap();
        assert_eq!(by_id.id, "bitcoin");
        assert_eq!(by_id.kind, CurrencyKind::Crypto);
        assert_eq!(by_id.label, "BTC");

        let by_symbol = table.classify("eth").unwrap();
        assert_eq!(by_symbol.id, "ethereum");
        assert!(by_symbol.is_crypto());
    }

    #[test]
    fn test_unknown_identifier_is_an_error() {
        let table = CurrencyTable::builtin();
        let err = table.classify("notacoin").unwrap_err();
        assert!(matches!(err, ConvertError::UnknownCurrency(ref id) if id == "notacoin"));
        assert!(!table.is_fiat("notacoin"));
        assert!(!table.is_crypto("notacoin"));
    }

    #[test]
    fn test_with_crypto_adds_and_deduplicates() {
        let table = CurrencyTable::builtin().with_crypto(vec![
            CryptoAsset {
                id: "Kaspa".to_string(),
                symbol: "KAS".to_string(),
            },
            CryptoAsset {
                id: "bitcoin".to_string(),
                symbol: "xbt".to_string(),
            },
            CryptoAsset {
                id: "usd".to_string(),
                symbol: "usd".to_string(),
            },
        ]);

        let kaspa = table.classify("kas").unwrap();
        assert_eq!(kaspa.id, "kaspa");
        assert_eq!(kaspa.label, "KAS");
        assert_eq!(table.classify("bitcoin").unwrap().label, "BTC");
        assert!(table.classify("xbt").is_err());
        assert_eq!(table.classify("usd").unwrap().kind, CurrencyKind::Fiat);
        assert_eq!(
            table.crypto().len(),
            CurrencyTable::builtin().crypto().len() + 1
        );
    }
}
