//! ReturnExtractor: price history -> single-period returns.

use crate::error::{Result, SimError};
use crate::types::{PricePoint, ReturnSeries, MIN_HISTORY, MIN_RETURNS};

/// Sort ascending by date, collapse duplicate dates (last occurrence wins)
/// and drop missing closes.
///
/// The sort is stable, so "last occurrence" refers to input order.
pub fn clean_history(history: &[PricePoint]) -> Vec<PricePoint> {
    let mut usable: Vec<PricePoint> = history.iter().copied().filter(|p| p.is_usable()).collect();
    usable.sort_by_key(|p| p.date);

    let mut out: Vec<PricePoint> = Vec::with_capacity(usable.len());
    for p in usable {
        match out.last_mut() {
            Some(prev) if prev.date == p.date => *prev = p,
            _ => out.push(p),
        }
    }
    out
}

/// Derive `close[i+1] / close[i] - 1` over the cleaned history.
///
/// Returns that are not finite (overflowing ratios) are dropped after
/// differencing; that is the only way the return count can fall below
/// `history_len - 1`.
pub fn extract_returns(history: &[PricePoint]) -> Result<ReturnSeries> {
    let cleaned = clean_history(history);

    let last = match cleaned.last() {
        Some(last) if cleaned.len() >= MIN_HISTORY => *last,
        _ => {
            return Err(SimError::InsufficientHistory {
                required: MIN_HISTORY,
                available: cleaned.len(),
            })
        }
    };

    let returns: Vec<f64> = cleaned
        .windows(2)
        .map(|w| w[1].close / w[0].close - 1.0)
        .filter(|r| r.is_finite())
        .collect();

    if returns.len() < MIN_RETURNS {
        return Err(SimError::InsufficientReturns {
            required: MIN_RETURNS,
            available: returns.len(),
        });
    }

    Ok(ReturnSeries {
        returns,
        last_close: last.close,
        last_date: last.date,
        history_len: cleaned.len(),
    })
}
