//! mcn-news
//!
//! News provider boundary and daily sentiment scoring.
//!
//! A provider fetches the company articles published on one calendar day; a
//! [`SentimentScorer`] turns each article into a compound score and
//! [`score_articles`] reduces them to one [`DailySentiment`] per symbol-day.
//!
//! Provider failures are returned as errors. Degrading them to neutral
//! sentiment is the caller's decision.

pub mod finnhub;
pub mod sentiment;
pub mod vader;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

pub use finnhub::FinnhubNewsProvider;
pub use mcn_md::ProviderError;
pub use sentiment::{
    score_articles, DailySentiment, SentimentScorer, HEADLINE_WEIGHT, SUMMARY_WEIGHT,
};
pub use vader::VaderScorer;

/// One company-news item. Missing or null text fields deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub headline: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    /// Publication time, UTC epoch seconds.
    #[serde(default)]
    pub datetime: i64,
}

fn null_as_empty<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

impl NewsArticle {
    pub fn new(headline: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            summary: summary.into(),
            ..Self::default()
        }
    }
}

/// Company-news provider contract.
#[async_trait::async_trait]
pub trait NewsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Articles published for `symbol` on `day` (inclusive, provider calendar).
    async fn company_news(
        &self,
        symbol: &str,
        day: NaiveDate,
    ) -> Result<Vec<NewsArticle>, ProviderError>;
}

/// Stand-in used when no news API key is configured; every fetch fails with
/// [`ProviderError::Config`] and the caller falls back to neutral sentiment.
#[derive(Debug, Clone)]
pub struct UnconfiguredNewsProvider {
    reason: String,
}

impl UnconfiguredNewsProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait::async_trait]
impl NewsProvider for UnconfiguredNewsProvider {
    fn name(&self) -> &'static str {
        "unconfigured"
    }

    async fn company_news(
        &self,
        _symbol: &str,
        _day: NaiveDate,
    ) -> Result<Vec<NewsArticle>, ProviderError> {
        Err(ProviderError::Config(self.reason.clone()))
    }
}
