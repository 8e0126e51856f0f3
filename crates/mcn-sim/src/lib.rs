//! mcn-sim
//!
//! Weighted bootstrap simulation core.
//!
//! Pipeline: HISTORY -> RETURNS -> WEIGHTED RESAMPLE -> SUMMARY
//!
//! - Single next-period step, no path simulation, no serial correlation
//! - Exponential sentiment tilt over observed returns (never invents new ones)
//! - Seeded runs are bit-reproducible (ChaCha8, fixed sequential draw order)
//! - Pure and synchronous: no I/O, no clock, no shared state

mod error;
pub mod returns;
pub mod sampler;
pub mod summary;
pub mod types;

pub use error::{Result, SimError};
pub use returns::{clean_history, extract_returns};
pub use sampler::{draw_outcomes, resampling_weights, tilt_sigma, ResamplingWeights};
pub use summary::{histogram, percentile_sorted, summarize, validate_histogram_bins};
pub use types::{
    Histogram, PricePoint, ReturnSeries, SimulatedOutcomes, SimulationConfig, SimulationSummary,
    MAX_ALPHA, MAX_HISTOGRAM_BINS, MAX_SAMPLE_COUNT, MIN_ALPHA, MIN_HISTOGRAM_BINS, MIN_HISTORY,
    MIN_RETURNS, MIN_SAMPLE_COUNT,
};

/// Run one simulation: extract returns, resample, summarise.
pub fn simulate(
    history: &[PricePoint],
    config: &SimulationConfig,
) -> Result<(SimulatedOutcomes, SimulationSummary)> {
    config.validate()?;
    let series = extract_returns(history)?;
    simulate_series(&series, config)
}

/// Resample and summarise an already-extracted return series.
///
/// The summary reports the sentiment actually used by the sampler (clamped to
/// `[-1, 1]`) and the configured alpha.
pub fn simulate_series(
    series: &ReturnSeries,
    config: &SimulationConfig,
) -> Result<(SimulatedOutcomes, SimulationSummary)> {
    let outcomes = draw_outcomes(series, config)?;

    let effective_sentiment = config.sentiment().clamp(-1.0, 1.0);
    let summary = summarize(
        &outcomes,
        series.last_close,
        series.history_len,
        effective_sentiment,
        config.alpha(),
    );

    tracing::debug!(
        history_len = series.history_len,
        n_returns = series.returns.len(),
        n_samples = outcomes.len(),
        p_up = summary.probability_up,
        "simulation complete"
    );

    Ok((outcomes, summary))
}

/// Histogram of a simulated sample; `bins` must be within 5..=200.
pub fn summarize_histogram(outcomes: &SimulatedOutcomes, bins: usize) -> Result<Histogram> {
    histogram(outcomes, bins)
}
