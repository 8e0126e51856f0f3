//! In-process provider fakes with call counters.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use mcn_md::{HistoryRequest, PriceProvider, ProviderError};
use mcn_news::{NewsArticle, NewsProvider};
use mcn_sim::PricePoint;

/// Returns the same closes for every request.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceProvider {
    closes: Vec<PricePoint>,
    calls: Arc<AtomicUsize>,
}

impl StaticPriceProvider {
    pub fn new(closes: Vec<PricePoint>) -> Self {
        Self {
            closes,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PriceProvider for StaticPriceProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch_daily_closes(
        &self,
        _req: &HistoryRequest,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.closes.clone())
    }
}

/// Fails every request with a fixed error.
#[derive(Debug, Clone)]
pub struct FailingPriceProvider {
    error: ProviderError,
}

impl FailingPriceProvider {
    pub fn new(error: ProviderError) -> Self {
        Self { error }
    }

    pub fn transport(msg: &str) -> Self {
        Self::new(ProviderError::Transport(msg.to_string()))
    }
}

#[async_trait::async_trait]
impl PriceProvider for FailingPriceProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn fetch_daily_closes(
        &self,
        _req: &HistoryRequest,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        Err(self.error.clone())
    }
}

/// News fake: returns fixed articles, or a fixed error, optionally after a
/// delay. Clones share the call counter.
#[derive(Debug, Clone)]
pub struct StaticNewsProvider {
    outcome: Result<Vec<NewsArticle>, ProviderError>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl StaticNewsProvider {
    pub fn new(articles: Vec<NewsArticle>) -> Self {
        Self {
            outcome: Ok(articles),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Provider down.
    pub fn failing(error: ProviderError) -> Self {
        Self {
            outcome: Err(error),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Two clearly bullish articles.
    pub fn bullish() -> Self {
        Self::new(vec![
            NewsArticle::new(
                "Great quarter as company beats earnings expectations",
                "Strong growth and excellent guidance",
            ),
            NewsArticle::new(
                "Analysts upgrade stock after great results",
                "Multiple upgrades and bullish sentiment",
            ),
        ])
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl NewsProvider for StaticNewsProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn company_news(
        &self,
        _symbol: &str,
        _day: NaiveDate,
    ) -> Result<Vec<NewsArticle>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        self.outcome.clone()
    }
}
