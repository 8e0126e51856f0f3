//! Canonical daily-close normalization.
//!
//! Converts provider rows into ascending, de-duplicated [`PricePoint`]s and
//! records what was dropped along the way. Rows are rejected (not repaired)
//! when the date or close cannot be parsed, or the close is not a positive
//! finite number.
//!
//! It does **not** enforce the minimum history length; that refusal belongs
//! to the simulation core.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use mcn_sim::PricePoint;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeError {
    InvalidDate(String),
    InvalidClose { date: String, raw: String },
    NonPositiveClose { date: NaiveDate, close: f64 },
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::InvalidDate(raw) => write!(f, "date could not be parsed: '{raw}'"),
            NormalizeError::InvalidClose { date, raw } => {
                write!(f, "close for {date} could not be parsed: '{raw}'")
            }
            NormalizeError::NonPositiveClose { date, close } => {
                write!(f, "close for {date} must be a positive finite number, got {close}")
            }
        }
    }
}

impl std::error::Error for NormalizeError {}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub rows_read: usize,
    pub rows_ok: usize,
    pub rows_rejected: usize,
    /// Rows whose date was already seen; the later row replaced the earlier.
    pub duplicates_dropped: usize,
    /// Oldest rows cut off by the lookback window.
    pub rows_trimmed: usize,
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Parse a `YYYY-MM-DD` date (a trailing time component is ignored).
pub fn parse_date(raw: &str) -> Result<NaiveDate, NormalizeError> {
    let t = raw.trim();
    let day = t.get(..10).unwrap_or(t);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|_| NormalizeError::InvalidDate(raw.to_string()))
}

pub fn parse_close(date: &str, raw: &str) -> Result<PricePoint, NormalizeError> {
    let d = parse_date(date)?;
    let close: f64 = raw.trim().parse().map_err(|_| NormalizeError::InvalidClose {
        date: date.to_string(),
        raw: raw.to_string(),
    })?;
    check_close(PricePoint::new(d, close))
}

fn check_close(p: PricePoint) -> Result<PricePoint, NormalizeError> {
    if p.close.is_finite() && p.close > 0.0 {
        Ok(p)
    } else {
        Err(NormalizeError::NonPositiveClose {
            date: p.date,
            close: p.close,
        })
    }
}

/// Accumulates rows in provider order, then emits a clean ascending series.
#[derive(Debug, Default)]
pub struct CloseNormalizer {
    by_date: BTreeMap<NaiveDate, f64>,
    report: NormalizeReport,
}

impl CloseNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string row (date, close) as returned by a JSON/CSV payload.
    pub fn push_raw(&mut self, date: &str, close: &str) {
        self.report.rows_read += 1;
        let parsed = parse_close(date, close);
        self.accept(parsed);
    }

    /// Add an already-typed row.
    pub fn push(&mut self, point: PricePoint) {
        self.report.rows_read += 1;
        let checked = check_close(point);
        self.accept(checked);
    }

    fn accept(&mut self, row: Result<PricePoint, NormalizeError>) {
        match row {
            Ok(p) => {
                if self.by_date.insert(p.date, p.close).is_some() {
                    self.report.duplicates_dropped += 1;
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "close row rejected");
                self.report.rows_rejected += 1;
            }
        }
    }

    /// Emit ascending closes, keeping only the most recent `lookback` when set.
    pub fn finish(mut self, lookback: Option<usize>) -> (Vec<PricePoint>, NormalizeReport) {
        let mut points: Vec<PricePoint> = self
            .by_date
            .into_iter()
            .map(|(date, close)| PricePoint::new(date, close))
            .collect();

        if let Some(n) = lookback {
            if points.len() > n {
                let cut = points.len() - n;
                points.drain(..cut);
                self.report.rows_trimmed = cut;
            }
        }

        self.report.rows_ok = points.len();
        (points, self.report)
    }
}
