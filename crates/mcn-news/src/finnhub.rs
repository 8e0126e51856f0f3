//! Finnhub `company-news` adapter.

use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use mcn_md::provider::status_error;
use serde_json::Value;

use crate::{NewsArticle, NewsProvider, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";

#[derive(Clone)]
pub struct FinnhubNewsProvider {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for FinnhubNewsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinnhubNewsProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl FinnhubNewsProvider {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, ProviderError> {
        Self::new_with_base_url(api_key, DEFAULT_BASE_URL.to_string(), timeout)
    }

    pub fn new_with_base_url(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::Config("finnhub api key is empty".to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Config(format!("http client build failed: {e}")))?;
        Ok(Self {
            api_key,
            http,
            base_url,
        })
    }

    fn build_news_url(&self) -> String {
        format!("{}/company-news", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl NewsProvider for FinnhubNewsProvider {
    fn name(&self) -> &'static str {
        "finnhub"
    }

    async fn company_news(
        &self,
        symbol: &str,
        day: NaiveDate,
    ) -> Result<Vec<NewsArticle>, ProviderError> {
        let day_s = day.format("%Y-%m-%d").to_string();
        let resp = self
            .http
            .get(self.build_news_url())
            .query(&[
                ("symbol", symbol),
                ("from", day_s.as_str()),
                ("to", day_s.as_str()),
                ("token", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Decode(format!("finnhub news json decode failed: {e}")))?;
        let articles = parse_articles(payload)?;

        tracing::debug!(symbol, day = %day_s, n_articles = articles.len(), "company news fetched");
        Ok(articles)
    }
}

/// A non-array payload (e.g. an error object) is treated as no news.
fn parse_articles(payload: Value) -> Result<Vec<NewsArticle>, ProviderError> {
    match payload {
        Value::Array(items) => items
            .into_iter()
            .map(|item| {
                serde_json::from_value::<NewsArticle>(item)
                    .map_err(|e| ProviderError::Decode(format!("finnhub news item: {e}")))
            })
            .collect(),
        _ => Ok(Vec::new()),
    }
}
