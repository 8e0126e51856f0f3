// Shared fixtures for mcn-sim scenario tests: business-day calendars and
// closed-form price series.
#![allow(dead_code)]

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use mcn_sim::PricePoint;

/// `n` consecutive weekdays starting at (or after) `start`.
pub fn business_days(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
    let mut out = Vec::with_capacity(n);
    let mut d = start;
    while out.len() < n {
        if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
            out.push(d);
        }
        d += Duration::days(1);
    }
    out
}

/// Closes compounded from a fixed list of returns, starting at `start_price`.
pub fn history_from_returns(start_price: f64, returns: &[f64]) -> Vec<PricePoint> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let days = business_days(start, returns.len() + 1);
    let mut close = start_price;
    let mut out = vec![PricePoint::new(days[0], close)];
    for (d, r) in days.iter().skip(1).zip(returns) {
        close *= 1.0 + r;
        out.push(PricePoint::new(*d, close));
    }
    out
}

/// Wobbly pseudo-random returns in roughly [-2%, +2%] plus `drift`.
pub fn wobble_returns(n: usize, drift: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let x = (i as f64 * 12.9898).sin() * 43_758.545_3;
            let u = x - x.floor();
            drift + (u - 0.5) * 0.04
        })
        .collect()
}
