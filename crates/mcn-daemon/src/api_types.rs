//! Request and response types for the mcn-daemon HTTP endpoints.
//!
//! No business logic lives here.

use serde::{Deserialize, Serialize};

pub const PREDICTION_METHOD: &str = "monte_carlo_weighted_bootstrap_returns";

// ---------------------------------------------------------------------------
// GET /  and  GET /health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

// ---------------------------------------------------------------------------
// GET /predict
// ---------------------------------------------------------------------------

/// Raw query string. Every field is optional here so missing values fall
/// back to the configured defaults and a missing symbol gets a 422 body in
/// the service's own error shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictQuery {
    pub symbol: Option<String>,
    pub period: Option<String>,
    pub n_sims: Option<usize>,
    pub seed: Option<u64>,
    pub alpha: Option<f64>,
    pub refresh_news: Option<bool>,
    pub include_histogram: Option<bool>,
    pub histogram_bins: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub symbol: String,
    /// Last market date in the history, `YYYY-MM-DD`.
    pub asof: String,
    pub last_close: f64,

    pub n_days_history: usize,
    pub n_sims: usize,
    pub method: String,

    pub news_sentiment: f64,
    pub news_article_count: u32,
    pub sentiment_alpha: f64,

    pub p_up: f64,
    pub expected_close: f64,
    pub expected_return: f64,

    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,

    /// `[p16, p84]`
    pub range_68: [f64; 2],
    /// `[p5, p95]`
    pub range_90: [f64; 2],

    /// Bin midpoints; omitted when `include_histogram=false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub histogram_bins: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub histogram_counts: Option<Vec<u64>>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error class, e.g. "insufficient_history".
    pub kind: String,
}
