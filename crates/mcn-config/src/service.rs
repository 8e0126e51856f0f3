use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use mcn_sim::{
    MAX_ALPHA, MAX_HISTOGRAM_BINS, MAX_SAMPLE_COUNT, MIN_ALPHA, MIN_HISTOGRAM_BINS,
    MIN_SAMPLE_COUNT,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ENV_DAEMON_ADDR, ENV_SIGNALS_DB_PATH};

/// Typed view of the merged config. Every key has a default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub simulation: SimulationDefaults,
    pub prices: PricesConfig,
    pub news: NewsConfig,
    pub cache: CacheConfig,
    pub secrets: SecretsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Query-parameter defaults for `/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationDefaults {
    pub default_n_sims: usize,
    /// `None` (YAML `null`) makes unseeded runs the default.
    pub default_seed: Option<u64>,
    pub default_alpha: f64,
    pub default_histogram_bins: usize,
}

impl Default for SimulationDefaults {
    fn default() -> Self {
        Self {
            default_n_sims: 10_000,
            default_seed: Some(42),
            default_alpha: 2.0,
            default_histogram_bins: 25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceProviderKind {
    #[default]
    #[serde(alias = "alpha_vantage")]
    Alphavantage,
    Finnhub,
}

impl PriceProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceProviderKind::Alphavantage => "alphavantage",
            PriceProviderKind::Finnhub => "finnhub",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricesConfig {
    pub provider: PriceProviderKind,
    /// Alpha Vantage `outputsize=full`; premium tiers only.
    pub full_output: bool,
    pub timeout_secs: u64,
    pub base_url: Option<String>,
}

impl Default for PricesConfig {
    fn default() -> Self {
        Self {
            provider: PriceProviderKind::default(),
            full_output: false,
            timeout_secs: 15,
            base_url: None,
        }
    }
}

impl PricesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub timeout_secs: u64,
    pub base_url: Option<String>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            base_url: None,
        }
    }
}

impl NewsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// In-memory cache when `sqlite_path` is absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub sqlite_path: Option<String>,
}

/// Env var NAMES holding provider keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    pub alphavantage_api_key_env: String,
    pub finnhub_api_key_env: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            alphavantage_api_key_env: "ALPHAVANTAGE_API_KEY".to_string(),
            finnhub_api_key_env: "FINNHUB_API_KEY".to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn from_json(config_json: &Value) -> Result<Self> {
        serde_json::from_value(config_json.clone()).context("config does not match ServiceConfig")
    }

    /// Apply `MCN_DAEMON_ADDR` / `MCN_SIGNALS_DB_PATH` from `lookup`.
    /// Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |k: &str| {
            lookup(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        if let Some(addr) = non_blank(ENV_DAEMON_ADDR) {
            self.server.addr = addr;
        }
        if let Some(path) = non_blank(ENV_SIGNALS_DB_PATH) {
            self.cache.sqlite_path = Some(path);
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.server
            .addr
            .parse()
            .with_context(|| format!("invalid server.addr '{}'", self.server.addr))
    }

    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        let sim = &self.simulation;
        if !(MIN_SAMPLE_COUNT..=MAX_SAMPLE_COUNT).contains(&sim.default_n_sims) {
            bail!(
                "simulation.default_n_sims must be within [{}, {}], got {}",
                MIN_SAMPLE_COUNT,
                MAX_SAMPLE_COUNT,
                sim.default_n_sims
            );
        }
        if !sim.default_alpha.is_finite() || !(MIN_ALPHA..=MAX_ALPHA).contains(&sim.default_alpha) {
            bail!(
                "simulation.default_alpha must be within [{MIN_ALPHA}, {MAX_ALPHA}], got {}",
                sim.default_alpha
            );
        }
        if !(MIN_HISTOGRAM_BINS..=MAX_HISTOGRAM_BINS).contains(&sim.default_histogram_bins) {
            bail!(
                "simulation.default_histogram_bins must be within [{}, {}], got {}",
                MIN_HISTOGRAM_BINS,
                MAX_HISTOGRAM_BINS,
                sim.default_histogram_bins
            );
        }
        if self.prices.timeout_secs == 0 || self.news.timeout_secs == 0 {
            bail!("provider timeouts must be at least 1 second");
        }
        Ok(())
    }
}
