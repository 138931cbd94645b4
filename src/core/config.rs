use crate::core::conversion::DEFAULT_PRECISION;
use crate::core::currency::CryptoAsset;
use crate::core::resolver::DEFAULT_REFERENCE_CURRENCY;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_FIAT_BASE_URL: &str = "https://open.er-api.com/v6";
pub const DEFAULT_CRYPTO_BASE_URL: &str = "https://api.coingecko.com/api/v3";

// Platform directory naming: <qualifier>.<organization>.<application>
const PROJECT_QUALIFIER: &str = "dev";
const PROJECT_ORGANIZATION: &str = "cconv";
const PROJECT_APPLICATION: &str = "cconv";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FiatProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CryptoProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub fiat: Option<FiatProviderConfig>,
    pub crypto: Option<CryptoProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            fiat: Some(FiatProviderConfig {
                base_url: DEFAULT_FIAT_BASE_URL.to_string(),
                api_key: None,
            }),
            crypto: Some(CryptoProviderConfig {
                base_url: DEFAULT_CRYPTO_BASE_URL.to_string(),
            }),
        }
    }
}

/// Currencies selected when none are given on the command line.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DefaultPair {
    pub from: String,
    pub to: String,
}

impl Default for DefaultPair {
    fn default() -> Self {
        DefaultPair {
            from: "INR".to_string(),
            to: "bitcoin".to_string(),
        }
    }
}

fn default_precision() -> usize {
    DEFAULT_PRECISION
}

fn default_reference_currency() -> String {
    DEFAULT_REFERENCE_CURRENCY.to_string()
}

fn default_cache_ttl_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub defaults: DefaultPair,
    #[serde(default = "default_precision")]
    pub precision: usize,
    #[serde(default = "default_reference_currency")]
    pub reference_currency: String,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default)]
    pub cryptos: Vec<CryptoAsset>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            defaults: DefaultPair::default(),
            precision: default_precision(),
            reference_currency: default_reference_currency(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cryptos: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Loads the config at the default location, or built-in defaults when there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from(PROJECT_QUALIFIER, PROJECT_ORGANIZATION, PROJECT_APPLICATION)
                .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn fiat_base_url(&self) -> &str {
        self.providers
            .fiat
            .as_ref()
            .map_or(DEFAULT_FIAT_BASE_URL, |p| &p.base_url)
    }

    pub fn fiat_api_key(&self) -> Option<&str> {
        self.providers
            .fiat
            .as_ref()
            .and_then(|p| p.api_key.as_deref())
    }

    pub fn crypto_base_url(&self) -> &str {
        self.providers
            .crypto
            .as_ref()
            .map_or(DEFAULT_CRYPTO_BASE_URL, |p| &p.base_url)
    }
}
