//! Shared router harness for mcn-daemon scenario tests.
//!
//! The router is driven with `tower::ServiceExt::oneshot`; no socket is bound.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use mcn_cache::{MemorySignalCache, SignalCache};
use mcn_config::SimulationDefaults;
use mcn_daemon::{routes, state::AppState};
use mcn_md::PriceProvider;
use mcn_news::{NewsProvider, VaderScorer};
use tower::ServiceExt; // oneshot

pub fn fixed_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 2).unwrap()
}

pub fn make_state(
    prices: Arc<dyn PriceProvider>,
    news: Arc<dyn NewsProvider>,
    cache: Arc<dyn SignalCache>,
) -> Arc<AppState> {
    Arc::new(
        AppState::new(
            prices,
            news,
            Arc::new(VaderScorer::new()),
            cache,
            SimulationDefaults::default(),
        )
        .with_clock(fixed_day),
    )
}

pub fn make_state_memory(
    prices: Arc<dyn PriceProvider>,
    news: Arc<dyn NewsProvider>,
) -> Arc<AppState> {
    make_state(prices, news, Arc::new(MemorySignalCache::new()))
}

/// Drive the router with a single GET and return (status, body as JSON).
pub async fn get_json(state: &Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
    let router = routes::build_router(Arc::clone(state));
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let body = resp
        .into_body()
        .collect()
        .await
        .expect("body collect failed")
        .to_bytes();
    let json = serde_json::from_slice(&body).expect("body is not valid JSON");
    (status, json)
}
