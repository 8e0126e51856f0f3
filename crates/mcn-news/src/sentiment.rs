//! Daily sentiment aggregation.

use serde::{Deserialize, Serialize};

use crate::NewsArticle;

pub const HEADLINE_WEIGHT: f64 = 0.7;
pub const SUMMARY_WEIGHT: f64 = 0.3;

/// Text scorer contract. Scores are compound values in `[-1, 1]`; empty
/// text scores `0.0`.
pub trait SentimentScorer: Send + Sync {
    fn score_text(&self, text: &str) -> f64;
}

/// One `(symbol, day)` sentiment signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySentiment {
    pub sentiment: f64,
    pub article_count: u32,
}

impl DailySentiment {
    pub fn new(sentiment: f64, article_count: u32) -> Self {
        Self {
            sentiment,
            article_count,
        }
    }

    /// No articles, no signal.
    pub fn neutral() -> Self {
        Self::new(0.0, 0)
    }
}

impl Default for DailySentiment {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Mean of `0.7 * headline + 0.3 * summary` over the articles.
pub fn score_articles(articles: &[NewsArticle], scorer: &dyn SentimentScorer) -> DailySentiment {
    if articles.is_empty() {
        return DailySentiment::neutral();
    }

    let total: f64 = articles
        .iter()
        .map(|a| {
            let h = scorer.score_text(a.headline.trim());
            let s = scorer.score_text(a.summary.trim());
            HEADLINE_WEIGHT * h + SUMMARY_WEIGHT * s
        })
        .sum();

    let n = articles.len();
    DailySentiment::new(
        (total / n as f64).clamp(-1.0, 1.0),
        u32::try_from(n).unwrap_or(u32::MAX),
    )
}
