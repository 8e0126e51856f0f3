//! mcn-cache
//!
//! Day-level news signal cache keyed by `(symbol, calendar day)`.
//!
//! The key never includes simulation parameters: every request for a symbol
//! on the same day shares one signal until it is explicitly refreshed.
//! A neutral `(0.0, 0)` signal is a normal, cacheable value.

mod memory;
mod sqlite;

use anyhow::Result;
use chrono::NaiveDate;

pub use mcn_news::DailySentiment as DailySignal;
pub use memory::MemorySignalCache;
pub use sqlite::SqliteSignalCache;

/// Canonical day key, `YYYY-MM-DD`.
pub fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Signal cache contract.
///
/// `put` is an idempotent upsert: writing the same key twice leaves the last
/// value.
#[async_trait::async_trait]
pub trait SignalCache: Send + Sync {
    fn name(&self) -> &'static str;

    async fn get(&self, symbol: &str, day: NaiveDate) -> Result<Option<DailySignal>>;

    async fn put(&self, symbol: &str, day: NaiveDate, signal: DailySignal) -> Result<()>;
}
