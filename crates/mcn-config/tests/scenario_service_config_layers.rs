//! Scenario: the shipped base config types cleanly and overlays apply.

use mcn_config::{
    load_layered_yaml_from_strings, report_unused_keys, PriceProviderKind, ServiceConfig,
    UnusedKeyPolicy,
};

const BASE_YAML: &str = include_str!("../../../config/base.yaml");

#[test]
fn base_config_is_valid_and_fully_consumed() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let cfg = ServiceConfig::from_json(&loaded.config_json).unwrap();
    cfg.validate().unwrap();

    assert_eq!(cfg.socket_addr().unwrap().port(), 8000);
    assert_eq!(cfg.simulation.default_n_sims, 10_000);
    assert_eq!(cfg.simulation.default_seed, Some(42));
    assert_eq!(cfg.cache.sqlite_path.as_deref(), Some("signals.sqlite3"));

    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail).unwrap();
    assert!(report.is_clean());
}

#[test]
fn overlay_switches_provider_and_keeps_base() {
    let overlay = r#"
prices:
  provider: "finnhub"
  base_url: "http://127.0.0.1:9999"
simulation:
  default_seed: null
"#;
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML, overlay]).unwrap();
    let cfg = ServiceConfig::from_json(&loaded.config_json).unwrap();

    assert_eq!(cfg.prices.provider, PriceProviderKind::Finnhub);
    assert_eq!(
        cfg.prices.base_url.as_deref(),
        Some("http://127.0.0.1:9999")
    );
    assert_eq!(cfg.prices.timeout_secs, 15);
    assert_eq!(cfg.simulation.default_seed, None);
}

#[test]
fn unused_keys_warn_or_fail() {
    let overlay = r#"
simulaton:
  default_alpha: 3.0
server:
  addr: "127.0.0.1:8001"
  workers: 4
"#;
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML, overlay]).unwrap();

    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn).unwrap();
    assert_eq!(
        report.unused_leaf_pointers,
        vec![
            "/server/workers".to_string(),
            "/simulaton/default_alpha".to_string()
        ]
    );

    let err = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail)
        .unwrap_err()
        .to_string();
    assert!(err.contains("CONFIG_UNUSED_KEYS"), "got: {err}");
}
