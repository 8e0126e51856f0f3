//! Day-level news signal resolution.
//!
//! Resolution order for `(symbol, day)`:
//! 1. cached signal (unless `refresh`)
//! 2. fetch + score, or the neutral `(0.0, 0)` fallback when the provider fails
//! 3. write back to the cache, fallback included
//!
//! At most one fetch runs per key at a time. Concurrent requests for the same
//! key queue on a per-key mutex; a waiter re-reads the cache once it holds
//! the lock and only refetches if it still misses. The per-key entry is
//! released on drop, so a cancelled request never leaves its key behind.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use chrono::NaiveDate;
use mcn_cache::{DailySignal, SignalCache};
use mcn_news::{score_articles, NewsProvider, SentimentScorer};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Where a resolved signal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    Cache,
    Fetched,
    /// Provider failed; neutral default used.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSignal {
    pub signal: DailySignal,
    pub source: SignalSource,
}

type SignalKey = (String, NaiveDate);
type KeyLock = Arc<Mutex<()>>;
type InFlightMap = StdMutex<HashMap<SignalKey, KeyLock>>;

/// One request's claim on a per-key lock. Dropping it removes the map entry
/// once no other request holds a clone.
struct InFlightKey<'a> {
    map: &'a InFlightMap,
    key: SignalKey,
    // `None` only while dropping
    lock: Option<KeyLock>,
}

impl<'a> InFlightKey<'a> {
    fn acquire(map: &'a InFlightMap, key: SignalKey) -> Self {
        let lock = {
            let mut entries = map.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(key.clone()).or_default())
        };
        Self {
            map,
            key,
            lock: Some(lock),
        }
    }

    fn lock(&self) -> Option<&KeyLock> {
        self.lock.as_ref()
    }
}

impl Drop for InFlightKey<'_> {
    fn drop(&mut self) {
        // clones are only taken under the map lock, so the count is exact here
        let mut entries = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        drop(self.lock.take());
        if entries.get(&self.key).map(Arc::strong_count) == Some(1) {
            entries.remove(&self.key);
        }
    }
}

pub struct SignalResolver {
    news: Arc<dyn NewsProvider>,
    scorer: Arc<dyn SentimentScorer>,
    cache: Arc<dyn SignalCache>,
    in_flight: InFlightMap,
}

impl SignalResolver {
    pub fn new(
        news: Arc<dyn NewsProvider>,
        scorer: Arc<dyn SentimentScorer>,
        cache: Arc<dyn SignalCache>,
    ) -> Self {
        Self {
            news,
            scorer,
            cache,
            in_flight: StdMutex::new(HashMap::new()),
        }
    }

    pub fn cache(&self) -> &Arc<dyn SignalCache> {
        &self.cache
    }

    pub async fn resolve(&self, symbol: &str, day: NaiveDate, refresh: bool) -> ResolvedSignal {
        if !refresh {
            if let Some(signal) = self.cached(symbol, day).await {
                return ResolvedSignal {
                    signal,
                    source: SignalSource::Cache,
                };
            }
        }

        // the claim must outlive the key guard: drop order releases the
        // mutex before the map entry
        let claim = InFlightKey::acquire(&self.in_flight, (symbol.to_string(), day));
        let _guard = match claim.lock() {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };
        self.resolve_locked(symbol, day, refresh).await
    }

    async fn resolve_locked(&self, symbol: &str, day: NaiveDate, refresh: bool) -> ResolvedSignal {
        // another request may have filled the key while we waited
        if !refresh {
            if let Some(signal) = self.cached(symbol, day).await {
                return ResolvedSignal {
                    signal,
                    source: SignalSource::Cache,
                };
            }
        }

        let (signal, source) = match self.news.company_news(symbol, day).await {
            Ok(articles) => {
                let s = score_articles(&articles, self.scorer.as_ref());
                debug!(
                    symbol, %day, sentiment = s.sentiment, articles = s.article_count,
                    "news scored"
                );
                (s, SignalSource::Fetched)
            }
            Err(e) => {
                warn!(
                    symbol, %day, provider = self.news.name(), error = %e,
                    "news unavailable; using neutral sentiment"
                );
                (DailySignal::neutral(), SignalSource::Fallback)
            }
        };

        if let Err(e) = self.cache.put(symbol, day, signal).await {
            warn!(symbol, %day, cache = self.cache.name(), error = %e, "signal cache write failed");
        }

        ResolvedSignal { signal, source }
    }

    async fn cached(&self, symbol: &str, day: NaiveDate) -> Option<DailySignal> {
        match self.cache.get(symbol, day).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(
                    symbol, %day, cache = self.cache.name(), error = %e,
                    "signal cache read failed; treating as miss"
                );
                None
            }
        }
    }

    /// Keys with a request currently queued or fetching.
    pub fn in_flight_keys(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
