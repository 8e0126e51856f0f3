//! End-to-end: 120 business-day synthetic closes, sentiment 0.
//!
//! GREEN when:
//! - expected close lies within the closes implied by the historical returns
//! - 0 <= p_up <= 1
//! - range_90 is an ordered pair and contains range_68
//! - outcome and histogram counts equal the requested sample count

mod common;

use mcn_sim::{extract_returns, simulate, summarize_histogram, SimulationConfig};

#[test]
fn uniform_run_over_120_business_days() {
    let history = common::history_from_returns(100.0, &common::wobble_returns(119, 0.0));
    assert_eq!(history.len(), 120);
    let last_close = history.last().unwrap().close;

    let cfg = SimulationConfig::new(5_000, Some(42), 0.0, 2.0).unwrap();
    let (outcomes, summary) = simulate(&history, &cfg).unwrap();

    assert_eq!(outcomes.len(), 5_000);
    assert_eq!(summary.last_close, last_close);
    assert_eq!(summary.history_length, 120);

    let series = extract_returns(&history).unwrap();
    let implied: Vec<f64> = series
        .returns
        .iter()
        .map(|r| last_close * (1.0 + r))
        .collect();
    let lo = implied.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = implied.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert!(summary.expected_close >= lo && summary.expected_close <= hi);
    assert!(outcomes.values().iter().all(|v| *v >= lo && *v <= hi));

    assert!((0.0..=1.0).contains(&summary.probability_up));
    assert_eq!(summary.range_90.len(), 2);
    assert!(summary.range_90[0] <= summary.range_90[1]);
    assert!(summary.range_90[0] <= summary.range_68[0]);
    assert!(summary.range_68[1] <= summary.range_90[1]);
    assert!(summary.p10 <= summary.p25);
    assert!(summary.p25 <= summary.p50);
    assert!(summary.p50 <= summary.p75);
    assert!(summary.p75 <= summary.p90);

    assert_eq!(summary.effective_sentiment, 0.0);
    assert!((summary.expected_return - (summary.expected_close / last_close - 1.0)).abs() < 1e-15);

    let hist = summarize_histogram(&outcomes, 25).unwrap();
    assert_eq!(hist.counts.len(), 25);
    assert_eq!(hist.bin_centers.len(), 25);
    assert_eq!(hist.total(), 5_000);
}

#[test]
fn histogram_total_matches_sample_count_across_configs() {
    let history = common::history_from_returns(40.0, &common::wobble_returns(80, 0.001));

    for (n, bins, sentiment, alpha) in [
        (1_000, 5, 0.0, 0.0),
        (7_777, 17, 0.6, 4.0),
        (20_000, 200, -0.9, 10.0),
    ] {
        let cfg = SimulationConfig::new(n, Some(9), sentiment, alpha).unwrap();
        let (outcomes, _) = simulate(&history, &cfg).unwrap();
        assert_eq!(outcomes.len(), n);
        let hist = summarize_histogram(&outcomes, bins).unwrap();
        assert_eq!(hist.counts.len(), bins);
        assert_eq!(hist.total(), n as u64);
    }
}
