//! Sentiment tilt shifts the outcome distribution in the sentiment's direction.
//!
//! GREEN when:
//! - on a two-direction return series, mean p_up over many seeds is higher
//!   under positive tilt than under uniform resampling (and lower under
//!   negative tilt)
//! - on a negative-drift series, alpha=6 with positive sentiment gives
//!   p_up >= the alpha=0 baseline for the same seed

mod common;

use mcn_sim::{simulate, SimulationConfig};

fn two_direction_returns() -> Vec<f64> {
    // 25 up days, 35 down days.
    (0..60).map(|i| if i % 12 < 5 { 0.012 } else { -0.009 }).collect()
}

fn mean_p_up(history: &[mcn_sim::PricePoint], sentiment: f64, alpha: f64) -> f64 {
    let seeds = 1..=20u64;
    let total: f64 = seeds
        .clone()
        .map(|seed| {
            let cfg = SimulationConfig::new(4_000, Some(seed), sentiment, alpha).unwrap();
            simulate(history, &cfg).unwrap().1.probability_up
        })
        .sum();
    total / seeds.count() as f64
}

#[test]
fn positive_tilt_raises_mean_p_up_on_two_direction_series() {
    let history = common::history_from_returns(100.0, &two_direction_returns());

    let uniform = mean_p_up(&history, 0.0, 0.0);
    let tilted_up = mean_p_up(&history, 0.8, 3.0);
    let tilted_down = mean_p_up(&history, -0.8, 3.0);

    assert!(tilted_up >= uniform, "tilted={tilted_up} uniform={uniform}");
    assert!(
        tilted_down <= uniform,
        "tilted={tilted_down} uniform={uniform}"
    );
    // 25 / 60 up days under plain bootstrap.
    assert!((uniform - 25.0 / 60.0).abs() < 0.02);
}

#[test]
fn alpha_six_beats_alpha_zero_on_negative_drift_series() {
    let history = common::history_from_returns(100.0, &common::wobble_returns(251, -0.0005));

    let base = SimulationConfig::new(20_000, Some(7), 0.6, 0.0).unwrap();
    let tilt = SimulationConfig::new(20_000, Some(7), 0.6, 6.0).unwrap();

    let (_, s0) = simulate(&history, &base).unwrap();
    let (_, s1) = simulate(&history, &tilt).unwrap();

    assert!(s1.probability_up >= s0.probability_up);
    assert!(s1.expected_close > s0.expected_close);
    assert_eq!(s1.effective_alpha, 6.0);
}
