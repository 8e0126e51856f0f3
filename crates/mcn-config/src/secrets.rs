//! Runtime secret resolution.
//!
//! Config stores only env var NAMES. [`resolve_secrets`] reads them once at
//! boot; the result is passed into provider constructors. Error and log
//! output names the variable, never the value.

use crate::ServiceConfig;

/// Provider keys resolved from the environment. A missing or blank variable
/// is `None`; the daemon then boots with an unconfigured provider.
/// **Values are redacted in `Debug` output.**
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ResolvedSecrets {
    pub alphavantage_api_key: Option<String>,
    pub finnhub_api_key: Option<String>,
}

impl std::fmt::Debug for ResolvedSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecrets")
            .field(
                "alphavantage_api_key",
                &self.alphavantage_api_key.as_ref().map(|_| "<REDACTED>"),
            )
            .field(
                "finnhub_api_key",
                &self.finnhub_api_key.as_ref().map(|_| "<REDACTED>"),
            )
            .finish()
    }
}

pub fn resolve_secrets(cfg: &ServiceConfig) -> ResolvedSecrets {
    resolve_secrets_with(cfg, |name| std::env::var(name).ok())
}

/// [`resolve_secrets`] over an arbitrary lookup.
pub fn resolve_secrets_with<F>(cfg: &ServiceConfig, lookup: F) -> ResolvedSecrets
where
    F: Fn(&str) -> Option<String>,
{
    let resolve = |name: &str| lookup(name.trim()).filter(|v| !v.trim().is_empty());
    ResolvedSecrets {
        alphavantage_api_key: resolve(&cfg.secrets.alphavantage_api_key_env),
        finnhub_api_key: resolve(&cfg.secrets.finnhub_api_key_env),
    }
}
