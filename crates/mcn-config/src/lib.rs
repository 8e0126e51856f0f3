//! mcn-config
//!
//! Layered YAML configuration for the forecasting service.
//!
//! Documents are merged in order (later wins), converted to JSON,
//! canonicalised and hashed. Literal secrets are refused: keys are named by
//! env var and resolved once at boot by [`resolve_secrets`].

mod secrets;
mod service;

use std::fs;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

pub use secrets::{resolve_secrets, resolve_secrets_with, ResolvedSecrets};
pub use service::{
    CacheConfig, NewsConfig, PriceProviderKind, PricesConfig, SecretsConfig, ServerConfig,
    ServiceConfig, SimulationDefaults,
};

/// Comma-separated list of YAML paths, merged left to right.
pub const ENV_CONFIG_PATHS: &str = "MCN_CONFIG";
/// Overrides `server.addr`.
pub const ENV_DAEMON_ADDR: &str = "MCN_DAEMON_ADDR";
/// Overrides `cache.sqlite_path`.
pub const ENV_SIGNALS_DB_PATH: &str = "MCN_SIGNALS_DB_PATH";

/// If any leaf string value starts with one of these, loading aborts with
/// CONFIG_SECRET_DETECTED.
const SECRET_PREFIXES: &[&str] = &[
    "sk-",
    "sk_live",
    "sk_test",
    "AKIA",
    "-----BEGIN",
    "ghp_",
    "gho_",
    "glpat-",
    "xoxb-",
    "xoxp-",
];

/// JSON-pointer prefixes the service reads. Leaves outside them are unused.
const CONSUMED_PREFIXES: &[&str] = &[
    "/server/addr",
    "/simulation/default_n_sims",
    "/simulation/default_seed",
    "/simulation/default_alpha",
    "/simulation/default_histogram_bins",
    "/prices/provider",
    "/prices/full_output",
    "/prices/timeout_secs",
    "/prices/base_url",
    "/news/timeout_secs",
    "/news/base_url",
    "/cache/sqlite_path",
    "/secrets/alphavantage_api_key_env",
    "/secrets/finnhub_api_key_env",
];

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw = fs::read_to_string(p)
            .with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }
    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        let v_json = serde_json::to_value(v_yaml)
            .context("yaml->json conversion failed")?;
        // an empty document parses as null and contributes nothing
        if !v_json.is_null() {
            merged = deep_merge(merged, v_json);
        }
    }

    enforce_no_secret_literals(&merged)?;

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

/// Paths from `MCN_CONFIG`, empty when unset.
pub fn config_paths_from_env() -> Vec<String> {
    let raw = std::env::var(ENV_CONFIG_PATHS).unwrap_or_default();
    split_paths(&raw)
}

fn split_paths(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load, type and validate the service config, then apply env overrides.
///
/// With no paths the built-in defaults are used.
pub fn load_service_config(paths: &[&str]) -> Result<(ServiceConfig, LoadedConfig)> {
    let loaded = if paths.is_empty() {
        load_layered_yaml_from_strings(&[])?
    } else {
        load_layered_yaml(paths)?
    };
    let mut cfg = ServiceConfig::from_json(&loaded.config_json)?;
    cfg.apply_overrides(|k| std::env::var(k).ok());
    cfg.validate()?;
    Ok((cfg, loaded))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    /// Minimal set of unused leaf pointers (sorted)
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Report config leaves the service never reads (typos, stale keys).
pub fn report_unused_keys(config_json: &Value, policy: UnusedKeyPolicy) -> Result<UnusedKeyReport> {
    let mut leaves: Vec<String> = Vec::new();
    collect_leaf_pointers(config_json, "", &mut leaves);

    let mut unused: Vec<String> = leaves
        .into_iter()
        .filter(|lp| !CONSUMED_PREFIXES.iter().any(|cp| is_prefix_pointer(cp, lp)))
        // an empty root document has the single leaf "/"
        .filter(|lp| lp != "/")
        .collect();
    unused.sort();
    unused.dedup();

    let report = UnusedKeyReport {
        unused_leaf_pointers: unused,
    };

    if policy == UnusedKeyPolicy::Fail && !report.is_clean() {
        let first: Vec<_> = report.unused_leaf_pointers.iter().take(12).collect();
        bail!(
            "CONFIG_UNUSED_KEYS: {} unused config leaf key(s) detected. First few: {:?}",
            report.unused_leaf_pointers.len(),
            first
        );
    }

    Ok(report)
}

/// "/a/b" consumes "/a/b" and "/a/b/c" but not "/a/bc".
fn is_prefix_pointer(prefix: &str, leaf: &str) -> bool {
    if leaf == prefix {
        return true;
    }
    leaf.strip_prefix(prefix)
        .map(|rest| rest.starts_with('/'))
        .unwrap_or(false)
}

fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) if !map.is_empty() => {
            for (k, vv) in map.iter() {
                let next = format!("{}/{}", prefix, escape_pointer_token(k));
                collect_leaf_pointers(vv, &next, out);
            }
        }
        Value::Array(arr) if !arr.is_empty() => {
            for (i, vv) in arr.iter().enumerate() {
                let next = format!("{prefix}/{i}");
                collect_leaf_pointers(vv, &next, out);
            }
        }
        _ => {
            let p = if prefix.is_empty() {
                "/".to_string()
            } else {
                prefix.to_string()
            };
            out.push(p);
        }
    }
}

fn escape_pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

/// serde_json maps are key-sorted, so compact serialisation is canonical.
fn canonicalize_json(v: &Value) -> Result<String> {
    serde_json::to_string(v).context("canonical json serialize failed")
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn enforce_no_secret_literals(v: &Value) -> Result<()> {
    let mut leaves = Vec::new();
    collect_leaf_pointers(v, "", &mut leaves);

    for ptr in leaves {
        let val = if ptr == "/" { Some(v) } else { v.pointer(&ptr) };
        if let Some(s) = val.and_then(Value::as_str) {
            if looks_like_secret(s) {
                bail!("CONFIG_SECRET_DETECTED leaf={} value=REDACTED", ptr);
            }
        }
    }
    Ok(())
}

fn looks_like_secret(s: &str) -> bool {
    let t = s.trim();
    if t.len() < 8 {
        return false;
    }
    SECRET_PREFIXES.iter().any(|p| t.starts_with(p))
}
