pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::list::ListFilter;
use crate::core::cache::Cache;
use crate::core::config::AppConfig;
use crate::core::{ConversionRequest, CurrencyTable, RateResolver};
use crate::providers::{coingecko::CoinGeckoProvider, exchange_rate::ExchangeRateProvider};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, PartialEq)]
pub enum AppCommand {
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
        swap: bool,
        json: bool,
    },
    List(ListFilter),
    Interactive,
}

/// Wires the HTTP providers, caches and reference tables described by `config`.
pub fn build_resolver(config: &AppConfig) -> RateResolver {
    let ttl = Some(Duration::from_secs(config.cache_ttl_secs));
    let rate_cache = Arc::new(Cache::with_ttl(ttl));
    let price_cache = Arc::new(Cache::with_ttl(ttl));

    let fiat_provider = ExchangeRateProvider::new(
        config.fiat_base_url(),
        config.fiat_api_key(),
        rate_cache,
    );
    let crypto_provider = CoinGeckoProvider::new(config.crypto_base_url(), price_cache);
    let currencies = CurrencyTable::builtin().with_crypto(config.cryptos.iter().cloned());

    RateResolver::new(
        Arc::new(currencies),
        Arc::new(fiat_provider),
        Arc::new(crypto_provider),
    )
    .with_reference_currency(&config.reference_currency)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("cconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        fiat = config.fiat_base_url(),
        crypto = config.crypto_base_url(),
        precision = config.precision,
        "Loaded config"
    );

    let resolver = build_resolver(&config);

    match command {
        AppCommand::Convert {
            amount,
            from,
            to,
            swap,
            json,
        } => {
            let from = from.unwrap_or_else(|| config.defaults.from.clone());
            let to = to.unwrap_or_else(|| config.defaults.to.clone());
            let mut request = ConversionRequest::from_input(&amount, &from, &to);
            if swap {
                request = request.swapped();
            }
            cli::convert::run(&resolver, &request, config.precision, json).await?;
            Ok(())
        }
        AppCommand::List(filter) => {
            cli::list::run(resolver.currencies(), filter);
            Ok(())
        }
        AppCommand::Interactive => {
            cli::interactive::run(resolver, &config.defaults, config.precision).await
        }
    }
}
