//! WeightedBootstrapSampler: sentiment-tilted resampling of historical returns.
//!
//! Draw order is fixed: one ChaCha8 stream, output slot `k` holds the `k`-th
//! draw. Uniform draws use `gen_range(0..n)`; tilted draws use a
//! `WeightedIndex` over the normalised tilt probabilities.

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::{Result, SimError};
use crate::types::{ReturnSeries, SimulatedOutcomes, SimulationConfig};

/// Below this, sigma is treated as zero and replaced by 1.0.
pub const SIGMA_FLOOR: f64 = 1e-12;
/// `|sentiment|` below this is "no signal".
pub const SENTIMENT_EPSILON: f64 = 1e-6;
/// `alpha` at or below this is "no tilt".
pub const ALPHA_EPSILON: f64 = 1e-9;
/// Tilt scores are clipped to `[-TILT_CLIP, TILT_CLIP]` before `exp`.
pub const TILT_CLIP: f64 = 20.0;

/// Resampling distribution over historical return indices.
#[derive(Clone, Debug, PartialEq)]
pub enum ResamplingWeights {
    Uniform,
    /// Normalised probabilities, one per return, summing to 1.
    Tilted(Vec<f64>),
}

impl ResamplingWeights {
    pub fn is_uniform(&self) -> bool {
        matches!(self, ResamplingWeights::Uniform)
    }

    /// Probability of each index, materialising the uniform case.
    pub fn probabilities(&self, n: usize) -> Vec<f64> {
        match self {
            ResamplingWeights::Uniform => vec![1.0 / n as f64; n],
            ResamplingWeights::Tilted(p) => p.clone(),
        }
    }
}

/// Population standard deviation, floored to 1.0 for near-constant series.
pub fn tilt_sigma(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 1.0;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let sigma = var.sqrt();
    if sigma.is_finite() && sigma >= SIGMA_FLOOR {
        sigma
    } else {
        1.0
    }
}

/// Exponential tilt `p_i ∝ exp(clip(alpha * sentiment * r_i / sigma))`.
///
/// Sentiment is re-clamped to `[-1, 1]` here regardless of upstream checks.
pub fn resampling_weights(returns: &[f64], sentiment: f64, alpha: f64) -> ResamplingWeights {
    let s = if sentiment.is_nan() {
        0.0
    } else {
        sentiment.clamp(-1.0, 1.0)
    };
    if returns.is_empty()
        || s.abs() < SENTIMENT_EPSILON
        || alpha.is_nan()
        || alpha <= ALPHA_EPSILON
    {
        return ResamplingWeights::Uniform;
    }

    let sigma = tilt_sigma(returns);
    let weights: Vec<f64> = returns
        .iter()
        .map(|r| (alpha * s * (r / sigma)).clamp(-TILT_CLIP, TILT_CLIP).exp())
        .collect();
    let total: f64 = weights.iter().sum();

    ResamplingWeights::Tilted(weights.into_iter().map(|w| w / total).collect())
}

fn rng_for(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Draw `config.sample_count()` returns with replacement and map each to
/// `last_close * (1 + r)`.
pub fn draw_outcomes(
    series: &ReturnSeries,
    config: &SimulationConfig,
) -> Result<SimulatedOutcomes> {
    config.validate()?;

    let returns = &series.returns;
    if returns.is_empty() {
        return Err(SimError::InsufficientReturns {
            required: crate::types::MIN_RETURNS,
            available: 0,
        });
    }

    let weights = resampling_weights(returns, config.sentiment(), config.alpha());
    let mut rng = rng_for(config.seed());
    let n = config.sample_count();
    let last_close = series.last_close;

    let values: Vec<f64> = match &weights {
        ResamplingWeights::Uniform => {
            debug!(
                n_returns = returns.len(),
                n_samples = n,
                "uniform bootstrap"
            );
            (0..n)
                .map(|_| last_close * (1.0 + returns[rng.gen_range(0..returns.len())]))
                .collect()
        }
        ResamplingWeights::Tilted(p) => {
            debug!(
                n_returns = returns.len(),
                n_samples = n,
                sentiment = config.sentiment(),
                alpha = config.alpha(),
                "tilted bootstrap"
            );
            let dist = WeightedIndex::new(p).map_err(|e| {
                SimError::invalid_config(format!("tilt weights are not a valid distribution: {e}"))
            })?;
            (0..n)
                .map(|_| last_close * (1.0 + returns[dist.sample(&mut rng)]))
                .collect()
        }
    };

    Ok(SimulatedOutcomes::from_draws(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(returns: Vec<f64>, last_close: f64) -> ReturnSeries {
        let history_len = returns.len() + 1;
        ReturnSeries {
            returns,
            last_close,
            last_date: NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            history_len,
        }
    }

    fn alternating(n: usize) -> Vec<f64> {
        (0..n).map(|i| if i % 2 == 0 { 0.01 } else { -0.01 }).collect()
    }

    #[test]
    fn zero_sentiment_is_uniform() {
        let r = alternating(40);
        assert!(resampling_weights(&r, 0.0, 5.0).is_uniform());
        assert!(resampling_weights(&r, 5e-7, 5.0).is_uniform());
    }

    #[test]
    fn zero_alpha_is_uniform() {
        let r = alternating(40);
        assert!(resampling_weights(&r, 0.9, 0.0).is_uniform());
        assert!(resampling_weights(&r, 0.9, 1e-10).is_uniform());
    }

    #[test]
    fn tilt_probabilities_are_normalised() {
        let r: Vec<f64> = (0..50).map(|i| (i as f64 - 25.0) / 1000.0).collect();
        let ResamplingWeights::Tilted(p) = resampling_weights(&r, 0.7, 3.0) else {
            panic!("expected tilted weights");
        };
        assert_eq!(p.len(), r.len());
        let sum: f64 = p.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(p.iter().all(|v| v.is_finite() && *v > 0.0));
    }

    #[test]
    fn positive_sentiment_up_weights_positive_returns() {
        let r = alternating(40);
        let ResamplingWeights::Tilted(p) = resampling_weights(&r, 1.0, 2.0) else {
            panic!("expected tilted weights");
        };
        assert!(p[0] > p[1], "up day should outweigh down day");

        let ResamplingWeights::Tilted(q) = resampling_weights(&r, -1.0, 2.0) else {
            panic!("expected tilted weights");
        };
        assert!(q[0] < q[1], "negative sentiment reverses the tilt");
    }

    #[test]
    fn sentiment_is_reclamped() {
        let r = alternating(40);
        assert_eq!(
            resampling_weights(&r, 7.0, 2.0),
            resampling_weights(&r, 1.0, 2.0)
        );
    }

    #[test]
    fn constant_returns_give_stable_weights() {
        // sigma == 0 -> floored to 1.0; all weights equal and finite.
        let r = vec![0.01; 30];
        assert_eq!(tilt_sigma(&r), 1.0);
        let p = resampling_weights(&r, 1.0, 10.0).probabilities(r.len());
        assert!(p.iter().all(|v| v.is_finite()));
        assert!(p.iter().all(|v| (v - 1.0 / 30.0).abs() < 1e-12));
    }

    #[test]
    fn extreme_scores_are_clipped_not_overflowed() {
        let mut r = alternating(40);
        r[0] = 50.0;
        let p = resampling_weights(&r, 1.0, 10.0).probabilities(r.len());
        let sum: f64 = p.iter().sum();
        assert!(p.iter().all(|v| v.is_finite()));
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn draw_produces_requested_count_and_maps_returns_to_closes() {
        let rs = series(alternating(40), 100.0);
        let cfg = SimulationConfig::uniform(2_000, Some(3)).unwrap();
        let out = draw_outcomes(&rs, &cfg).unwrap();

        assert_eq!(out.len(), 2_000);
        assert!(out
            .values()
            .iter()
            .all(|v| (v - 101.0).abs() < 1e-9 || (v - 99.0).abs() < 1e-9));
    }

    #[test]
    fn seeded_draws_are_bit_identical() {
        let rs = series(alternating(40), 100.0);
        let cfg = SimulationConfig::new(5_000, Some(11), 0.4, 3.0).unwrap();
        let a = draw_outcomes(&rs, &cfg).unwrap();
        let b = draw_outcomes(&rs, &cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_sentiment_and_zero_alpha_draw_the_same_stream() {
        let r: Vec<f64> = (0..60).map(|i| ((i * 7) % 13) as f64 / 1000.0 - 0.006).collect();
        let rs = series(r, 250.0);
        let no_signal = SimulationConfig::new(3_000, Some(5), 0.0, 6.0).unwrap();
        let no_tilt = SimulationConfig::new(3_000, Some(5), 0.8, 0.0).unwrap();
        assert_eq!(
            draw_outcomes(&rs, &no_signal).unwrap(),
            draw_outcomes(&rs, &no_tilt).unwrap()
        );
    }
}
