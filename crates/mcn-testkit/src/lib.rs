//! mcn-testkit
//!
//! Shared fixtures for scenario tests: seeded synthetic price series, a
//! `date,close` CSV loader, and in-process fake providers.

pub mod fakes;

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use mcn_sim::PricePoint;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

pub use fakes::{FailingPriceProvider, StaticNewsProvider, StaticPriceProvider};

/// `n` consecutive Monday-to-Friday dates starting at (or after) `start`.
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

pub fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Compounded series: `close[i] = start_price * prod(1 + r_k)` with
/// `r_k ~ Normal(drift, vol)`, one per business day from 2024-01-01.
/// `vol` must be finite and non-negative.
pub fn compounded_closes(
    n: usize,
    start_price: f64,
    drift: f64,
    vol: f64,
    seed: u64,
) -> Result<Vec<PricePoint>> {
    // rand_distr accepts a negative std dev and mirrors the distribution
    if !(vol.is_finite() && vol >= 0.0) {
        bail!("vol must be finite and non-negative, got {vol}");
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(drift, vol)
        .with_context(|| format!("invalid return distribution drift={drift} vol={vol}"))?;

    let mut price = start_price;
    Ok(business_days(default_start(), n)
        .into_iter()
        .map(|date| {
            price *= 1.0 + normal.sample(&mut rng);
            PricePoint::new(date, price)
        })
        .collect())
}

/// Additive walk: `close[i] = start_price + sum(step_k)` with unit normal
/// steps, floored at 1.0 so every close stays usable.
pub fn random_walk_closes(n: usize, start_price: f64, seed: u64) -> Vec<PricePoint> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut price = start_price;
    business_days(default_start(), n)
        .into_iter()
        .map(|date| {
            let step: f64 = rand_distr::StandardNormal.sample(&mut rng);
            price = (price + step).max(1.0);
            PricePoint::new(date, price)
        })
        .collect()
}

/// Constant close on every business day.
pub fn flat_closes(n: usize, price: f64) -> Vec<PricePoint> {
    business_days(default_start(), n)
        .into_iter()
        .map(|date| PricePoint::new(date, price))
        .collect()
}

pub fn load_closes_csv(path: impl AsRef<Path>) -> Result<Vec<PricePoint>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("open closes csv: {}", path.display()))?;
    read_closes_csv(file)
}

/// Parse a headered `date,close` CSV. Dates must be strictly increasing.
pub fn read_closes_csv<R: Read>(reader: R) -> Result<Vec<PricePoint>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut out = Vec::new();

    for (i, rec) in rdr.records().enumerate() {
        let rec = rec.with_context(|| format!("read csv row {}", i + 1))?;
        let date = rec
            .get(0)
            .context("missing date column")?
            .trim()
            .parse::<NaiveDate>()
            .with_context(|| format!("parse date on row {}", i + 1))?;
        let close = rec
            .get(1)
            .context("missing close column")?
            .trim()
            .parse::<f64>()
            .with_context(|| format!("parse close on row {}", i + 1))?;
        out.push(PricePoint::new(date, close));
    }

    for w in out.windows(2) {
        if w[0].date >= w[1].date {
            bail!("closes not strictly increasing at {}", w[1].date);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_days_skip_weekends() {
        // 2024-01-05 is a Friday
        let d = business_days(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), 3);
        assert_eq!(
            d,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            ]
        );
    }

    #[test]
    fn compounded_series_is_seeded() {
        let a = compounded_closes(50, 100.0, -0.0005, 0.01, 2).unwrap();
        let b = compounded_closes(50, 100.0, -0.0005, 0.01, 2).unwrap();
        let c = compounded_closes(50, 100.0, -0.0005, 0.01, 3).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|p| p.close > 0.0 && p.close.is_finite()));
    }

    #[test]
    fn compounded_series_rejects_bad_vol() {
        for vol in [-1.0, -1e-9, f64::NAN, f64::INFINITY] {
            let err = compounded_closes(50, 100.0, 0.0, vol, 2).unwrap_err();
            assert!(err.to_string().contains("vol"), "{vol}: {err}");
        }
        let flat = compounded_closes(5, 100.0, 0.0, 0.0, 2).unwrap();
        assert!(flat.iter().all(|p| p.close == 100.0));
    }

    #[test]
    fn random_walk_stays_positive() {
        let s = random_walk_closes(500, 3.0, 1);
        assert_eq!(s.len(), 500);
        assert!(s.iter().all(|p| p.close >= 1.0));
    }

    #[test]
    fn csv_rejects_out_of_order_rows() {
        let raw = "date,close\n2024-01-03,10\n2024-01-02,11\n";
        assert!(read_closes_csv(raw.as_bytes()).is_err());
    }

    #[test]
    fn csv_rejects_bad_close() {
        let raw = "date,close\n2024-01-02,ten\n";
        let err = read_closes_csv(raw.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("row 1"));
    }
}
