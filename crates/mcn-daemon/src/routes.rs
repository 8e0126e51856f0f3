//! Axum router and HTTP handlers for mcn-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers, tests use the bare router.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use mcn_md::{HistoryRequest, Period};
use mcn_sim::{
    extract_returns, simulate_series, summarize_histogram, validate_histogram_bins,
    SimulationConfig,
};
use tracing::info;

use crate::{
    api_types::{HealthResponse, PredictQuery, PredictionResponse, RootResponse, PREDICTION_METHOD},
    error::ApiError,
    state::AppState,
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/predict", get(predict))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /  GET /health
// ---------------------------------------------------------------------------

pub(crate) async fn root() -> impl IntoResponse {
    Json(RootResponse {
        message: "API is running. Try /predict?symbol=AAPL".to_string(),
    })
}

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            service: st.build.service.to_string(),
            version: st.build.version.to_string(),
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /predict
// ---------------------------------------------------------------------------

/// Validated `/predict` parameters with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictParams {
    pub symbol: String,
    pub period: Period,
    pub seed: Option<u64>,
    pub refresh_news: bool,
    pub include_histogram: bool,
    pub histogram_bins: usize,
    /// Range-checked; sentiment joins these once the news signal is known.
    pub n_sims: usize,
    pub alpha: f64,
}

impl PredictParams {
    pub fn from_query(q: PredictQuery, st: &AppState) -> Result<Self, ApiError> {
        let d = &st.defaults;

        let symbol = q
            .symbol
            .as_deref()
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::invalid_query("symbol is required"))?;

        let period = match q.period.as_deref() {
            None => Period::default(),
            Some(raw) => raw.parse::<Period>().map_err(ApiError::invalid_query)?,
        };

        let histogram_bins = q.histogram_bins.unwrap_or(d.default_histogram_bins);
        validate_histogram_bins(histogram_bins)?;

        let n_sims = q.n_sims.unwrap_or(d.default_n_sims);
        let alpha = q.alpha.unwrap_or(d.default_alpha);
        let seed = q.seed.or(d.default_seed);
        // range-check before any provider call
        SimulationConfig::new(n_sims, seed, 0.0, alpha)?;

        Ok(Self {
            symbol,
            period,
            seed,
            refresh_news: q.refresh_news.unwrap_or(false),
            include_histogram: q.include_histogram.unwrap_or(true),
            histogram_bins,
            n_sims,
            alpha,
        })
    }
}

pub(crate) async fn predict(
    State(st): State<Arc<AppState>>,
    query: Result<Query<PredictQuery>, QueryRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Query(q) = query.map_err(|e| ApiError::invalid_query(e.body_text()))?;
    let params = PredictParams::from_query(q, &st)?;

    // 1) price history; any provider failure is fatal to the request
    let req = HistoryRequest::new(params.symbol.clone(), params.period);
    let closes = st
        .prices
        .fetch_daily_closes(&req)
        .await
        .map_err(|e| ApiError::price_provider(st.prices.name(), &e))?;
    let series = extract_returns(&closes)?;

    // 2) today's news signal, cached per (symbol, day)
    let today = (st.today)();
    let resolved = st
        .signals
        .resolve(&params.symbol, today, params.refresh_news)
        .await;
    let signal = resolved.signal;

    // 3) weighted bootstrap, off the async reactor
    let config = SimulationConfig::new(
        params.n_sims,
        params.seed,
        signal.sentiment.clamp(-1.0, 1.0),
        params.alpha,
    )?;
    let include_histogram = params.include_histogram;
    let bins = params.histogram_bins;
    let (series, summary, histogram) = tokio::task::spawn_blocking(move || {
        let (outcomes, summary) = simulate_series(&series, &config)?;
        let histogram = if include_histogram {
            Some(summarize_histogram(&outcomes, bins)?)
        } else {
            None
        };
        Ok::<_, mcn_sim::SimError>((series, summary, histogram))
    })
    .await
    .map_err(|e| ApiError::internal(format!("simulation task failed: {e}")))??;

    info!(
        symbol = %params.symbol,
        asof = %series.last_date,
        n_sims = params.n_sims,
        alpha = params.alpha,
        sentiment = signal.sentiment,
        articles = signal.article_count,
        news_source = ?resolved.source,
        p_up = summary.probability_up,
        "prediction served"
    );

    let (histogram_bins, histogram_counts) = match histogram {
        Some(h) => (Some(h.bin_centers), Some(h.counts)),
        None => (None, None),
    };

    Ok(Json(PredictionResponse {
        symbol: params.symbol,
        asof: series.last_date.format("%Y-%m-%d").to_string(),
        last_close: summary.last_close,
        n_days_history: summary.history_length,
        n_sims: params.n_sims,
        method: PREDICTION_METHOD.to_string(),
        news_sentiment: summary.effective_sentiment,
        news_article_count: signal.article_count,
        sentiment_alpha: summary.effective_alpha,
        p_up: summary.probability_up,
        expected_close: summary.expected_close,
        expected_return: summary.expected_return,
        p10: summary.p10,
        p25: summary.p25,
        p50: summary.p50,
        p75: summary.p75,
        p90: summary.p90,
        range_68: summary.range_68,
        range_90: summary.range_90,
        histogram_bins,
        histogram_counts,
    }))
}
