use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Minimum cleaned price observations required to simulate.
pub const MIN_HISTORY: usize = 30;
/// Minimum finite returns required after differencing.
pub const MIN_RETURNS: usize = 20;

pub const MIN_SAMPLE_COUNT: usize = 1_000;
pub const MAX_SAMPLE_COUNT: usize = 200_000;

pub const MIN_ALPHA: f64 = 0.0;
pub const MAX_ALPHA: f64 = 10.0;

pub const MIN_HISTOGRAM_BINS: usize = 5;
pub const MAX_HISTOGRAM_BINS: usize = 200;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One daily close. A non-finite or non-positive `close` counts as missing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }

    pub(crate) fn is_usable(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}

/// Immutable simulation parameters. Construct through [`SimulationConfig::new`].
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    sample_count: usize,
    seed: Option<u64>,
    sentiment: f64,
    alpha: f64,
}

impl SimulationConfig {
    pub fn new(sample_count: usize, seed: Option<u64>, sentiment: f64, alpha: f64) -> Result<Self> {
        let cfg = Self {
            sample_count,
            seed,
            sentiment,
            alpha,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Uniform bootstrap (no sentiment tilt).
    pub fn uniform(sample_count: usize, seed: Option<u64>) -> Result<Self> {
        Self::new(sample_count, seed, 0.0, 0.0)
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn sentiment(&self) -> f64 {
        self.sentiment
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(MIN_SAMPLE_COUNT..=MAX_SAMPLE_COUNT).contains(&self.sample_count) {
            return Err(SimError::invalid_config(format!(
                "sample_count must be within [{MIN_SAMPLE_COUNT}, {MAX_SAMPLE_COUNT}], got {}",
                self.sample_count
            )));
        }
        if !self.alpha.is_finite() || !(MIN_ALPHA..=MAX_ALPHA).contains(&self.alpha) {
            return Err(SimError::invalid_config(format!(
                "alpha must be within [{MIN_ALPHA}, {MAX_ALPHA}], got {}",
                self.alpha
            )));
        }
        if !self.sentiment.is_finite() || !(-1.0..=1.0).contains(&self.sentiment) {
            return Err(SimError::invalid_config(format!(
                "sentiment must be within [-1, 1], got {}",
                self.sentiment
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Derived
// ---------------------------------------------------------------------------

/// Period-over-period fractional returns derived from a cleaned history.
#[derive(Clone, Debug, PartialEq)]
pub struct ReturnSeries {
    pub returns: Vec<f64>,
    /// Close of the most recent cleaned observation.
    pub last_close: f64,
    /// Date of the most recent cleaned observation.
    pub last_date: NaiveDate,
    /// Number of cleaned price observations the returns came from.
    pub history_len: usize,
}

/// Simulated next-period closes. Never empty, every value finite.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatedOutcomes {
    values: Vec<f64>,
}

impl SimulatedOutcomes {
    pub(crate) fn from_draws(values: Vec<f64>) -> Self {
        debug_assert!(!values.is_empty());
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub(crate) fn sorted(&self) -> Vec<f64> {
        let mut v = self.values.clone();
        v.sort_by(f64::total_cmp);
        v
    }
}

impl TryFrom<Vec<f64>> for SimulatedOutcomes {
    type Error = SimError;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(SimError::invalid_config("simulated outcomes must not be empty"));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(SimError::invalid_config(format!(
                "simulated outcomes must be finite, found {bad}"
            )));
        }
        Ok(Self { values })
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Statistical summary of one simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub last_close: f64,
    pub expected_close: f64,
    pub expected_return: f64,
    /// Fraction of outcomes strictly above `last_close`.
    pub probability_up: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    /// `[p16, p84]`
    pub range_68: [f64; 2],
    /// `[p5, p95]`
    pub range_90: [f64; 2],
    pub history_length: usize,
    pub effective_sentiment: f64,
    pub effective_alpha: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bin_centers: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}
