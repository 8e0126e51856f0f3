use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::{DailySignal, SignalCache};

/// Process-local cache; contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemorySignalCache {
    entries: RwLock<HashMap<(String, NaiveDate), DailySignal>>,
}

impl MemorySignalCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl SignalCache for MemorySignalCache {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, symbol: &str, day: NaiveDate) -> Result<Option<DailySignal>> {
        let entries = self.entries.read().await;
        Ok(entries.get(&(symbol.to_string(), day)).copied())
    }

    async fn put(&self, symbol: &str, day: NaiveDate, signal: DailySignal) -> Result<()> {
        self.entries
            .write()
            .await
            .insert((symbol.to_string(), day), signal);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[tokio::test]
    async fn miss_then_hit() {
        let c = MemorySignalCache::new();
        assert_eq!(c.get("AAPL", day(1)).await.unwrap(), None);

        let signal = DailySignal::new(0.42, 3);
        c.put("AAPL", day(1), signal).await.unwrap();
        assert_eq!(c.get("AAPL", day(1)).await.unwrap(), Some(signal));
        // other day, other symbol
        assert_eq!(c.get("AAPL", day(2)).await.unwrap(), None);
        assert_eq!(c.get("MSFT", day(1)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_overwrites() {
        let c = MemorySignalCache::new();
        let neutral = DailySignal::neutral();
        let first = DailySignal::new(0.42, 3);
        c.put("AAPL", day(1), first).await.unwrap();
        c.put("AAPL", day(1), neutral).await.unwrap();
        assert_eq!(c.get("AAPL", day(1)).await.unwrap(), Some(neutral));
        assert_eq!(c.len().await, 1);
    }
}
