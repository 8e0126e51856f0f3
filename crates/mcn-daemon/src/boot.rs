//! Wire concrete collaborators from config + resolved secrets.
//!
//! A missing API key never aborts boot: the affected provider is replaced by
//! its unconfigured stand-in so `/` and `/health` still serve, `/predict`
//! answers 502 for prices and news degrades to neutral.

use std::sync::Arc;

use anyhow::{Context, Result};
use mcn_cache::{MemorySignalCache, SignalCache, SqliteSignalCache};
use mcn_config::{PriceProviderKind, ResolvedSecrets, ServiceConfig};
use mcn_md::{
    AlphaVantagePriceProvider, FinnhubPriceProvider, PriceProvider, UnconfiguredPriceProvider,
};
use mcn_news::{FinnhubNewsProvider, NewsProvider, UnconfiguredNewsProvider, VaderScorer};
use tracing::{info, warn};

use crate::state::AppState;

pub async fn build_state(cfg: &ServiceConfig, secrets: &ResolvedSecrets) -> Result<AppState> {
    let prices = price_provider(cfg, secrets);
    let news = news_provider(cfg, secrets);
    let cache = signal_cache(cfg).await?;

    info!(
        prices = prices.name(),
        news = news.name(),
        cache = cache.name(),
        "collaborators wired"
    );

    Ok(AppState::new(
        prices,
        news,
        Arc::new(VaderScorer::new()),
        cache,
        cfg.simulation.clone(),
    ))
}

pub fn price_provider(cfg: &ServiceConfig, secrets: &ResolvedSecrets) -> Arc<dyn PriceProvider> {
    let p = &cfg.prices;
    let (key, env_name) = match p.provider {
        PriceProviderKind::Alphavantage => (
            secrets.alphavantage_api_key.clone(),
            &cfg.secrets.alphavantage_api_key_env,
        ),
        PriceProviderKind::Finnhub => (
            secrets.finnhub_api_key.clone(),
            &cfg.secrets.finnhub_api_key_env,
        ),
    };

    let Some(key) = key else {
        let reason = format!("{} is not set", env_name);
        warn!(
            provider = p.provider.as_str(),
            "{reason}; price requests will fail"
        );
        return Arc::new(UnconfiguredPriceProvider::new(reason));
    };

    let built: Result<Arc<dyn PriceProvider>, _> = match p.provider {
        PriceProviderKind::Alphavantage => {
            let r = match &p.base_url {
                Some(url) => {
                    AlphaVantagePriceProvider::new_with_base_url(key, url.clone(), p.timeout())
                }
                None => AlphaVantagePriceProvider::new(key, p.timeout()),
            };
            r.map(|a| Arc::new(a.with_full_output(p.full_output)) as Arc<dyn PriceProvider>)
        }
        PriceProviderKind::Finnhub => {
            let r = match &p.base_url {
                Some(url) => FinnhubPriceProvider::new_with_base_url(key, url.clone(), p.timeout()),
                None => FinnhubPriceProvider::new(key, p.timeout()),
            };
            r.map(|f| Arc::new(f) as Arc<dyn PriceProvider>)
        }
    };

    built.unwrap_or_else(|e| {
        warn!(provider = p.provider.as_str(), error = %e, "price provider init failed");
        Arc::new(UnconfiguredPriceProvider::new(e.to_string()))
    })
}

pub fn news_provider(cfg: &ServiceConfig, secrets: &ResolvedSecrets) -> Arc<dyn NewsProvider> {
    let n = &cfg.news;
    let Some(key) = secrets.finnhub_api_key.clone() else {
        let reason = format!("{} is not set", cfg.secrets.finnhub_api_key_env);
        warn!("{reason}; news sentiment will be neutral");
        return Arc::new(UnconfiguredNewsProvider::new(reason));
    };

    let built = match &n.base_url {
        Some(url) => FinnhubNewsProvider::new_with_base_url(key, url.clone(), n.timeout()),
        None => FinnhubNewsProvider::new(key, n.timeout()),
    };
    match built {
        Ok(f) => Arc::new(f),
        Err(e) => {
            warn!(error = %e, "news provider init failed");
            Arc::new(UnconfiguredNewsProvider::new(e.to_string()))
        }
    }
}

pub async fn signal_cache(cfg: &ServiceConfig) -> Result<Arc<dyn SignalCache>> {
    match &cfg.cache.sqlite_path {
        Some(path) => {
            let cache = SqliteSignalCache::connect_path(path)
                .await
                .with_context(|| format!("signal cache unavailable at {path}"))?;
            Ok(Arc::new(cache))
        }
        None => Ok(Arc::new(MemorySignalCache::new())),
    }
}
