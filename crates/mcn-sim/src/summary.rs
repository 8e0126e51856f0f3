//! OutcomeSummarizer: point statistics, percentiles and histogram.

use crate::error::{Result, SimError};
use crate::types::{
    Histogram, SimulatedOutcomes, SimulationSummary, MAX_HISTOGRAM_BINS, MIN_HISTOGRAM_BINS,
};

/// Bucket counts outside 5..=200 are a configuration error.
pub fn validate_histogram_bins(bins: usize) -> Result<()> {
    if !(MIN_HISTOGRAM_BINS..=MAX_HISTOGRAM_BINS).contains(&bins) {
        return Err(SimError::invalid_config(format!(
            "histogram bins must be within [{MIN_HISTOGRAM_BINS}, {MAX_HISTOGRAM_BINS}], got {bins}"
        )));
    }
    Ok(())
}

/// Linear-interpolation percentile over an ascending, non-empty slice.
///
/// Rank `h = (n - 1) * q / 100`; the result interpolates between the order
/// statistics at `floor(h)` and `floor(h) + 1`.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * (q.clamp(0.0, 100.0) / 100.0);
    let lo = h.floor() as usize;
    if lo + 1 >= n {
        return sorted[n - 1];
    }
    let frac = h - lo as f64;
    sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
}

/// Reduce outcomes to a [`SimulationSummary`].
pub fn summarize(
    outcomes: &SimulatedOutcomes,
    last_close: f64,
    history_length: usize,
    effective_sentiment: f64,
    effective_alpha: f64,
) -> SimulationSummary {
    let values = outcomes.values();
    let n = values.len() as f64;

    let expected_close = values.iter().sum::<f64>() / n;
    let up = values.iter().filter(|&&v| v > last_close).count();

    let sorted = outcomes.sorted();
    let pct = |q: f64| percentile_sorted(&sorted, q);

    SimulationSummary {
        last_close,
        expected_close,
        expected_return: expected_close / last_close - 1.0,
        probability_up: up as f64 / n,
        p10: pct(10.0),
        p25: pct(25.0),
        p50: pct(50.0),
        p75: pct(75.0),
        p90: pct(90.0),
        range_68: [pct(16.0), pct(84.0)],
        range_90: [pct(5.0), pct(95.0)],
        history_length,
        effective_sentiment,
        effective_alpha,
    }
}

/// Equal-width histogram over the observed `[min, max]` of the outcomes.
///
/// A zero-width range is widened to `[v - 0.5, v + 0.5]`. The last bucket is
/// closed on the right so the maximum is always counted.
pub fn histogram(outcomes: &SimulatedOutcomes, bins: usize) -> Result<Histogram> {
    validate_histogram_bins(bins)?;

    let values = outcomes.values();
    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let span = hi - lo;
    let edges: Vec<f64> = (0..=bins)
        .map(|i| lo + span * i as f64 / bins as f64)
        .collect();

    let mut counts = vec![0u64; bins];
    let norm = bins as f64 / span;
    for &v in values {
        let mut idx = (((v - lo) * norm) as usize).min(bins - 1);
        // Float rounding can land a value one bucket off its edges.
        if v < edges[idx] && idx > 0 {
            idx -= 1;
        } else if idx + 1 < bins && v >= edges[idx + 1] {
            idx += 1;
        }
        counts[idx] += 1;
    }

    let bin_centers = edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect();
    Ok(Histogram {
        bin_centers,
        counts,
    })
}
