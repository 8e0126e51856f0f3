//! Finnhub `stock/candle` adapter (daily resolution).

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use mcn_sim::PricePoint;
use serde::Deserialize;

use crate::normalizer::CloseNormalizer;
use crate::provider::{status_error, ProviderError};
use crate::{HistoryRequest, PriceProvider};

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";

/// Daily closes from Finnhub candles.
///
/// A `"no_data"` status or mismatched arrays yield an empty series; the
/// caller refuses it downstream as insufficient history.
#[derive(Clone)]
pub struct FinnhubPriceProvider {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for FinnhubPriceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinnhubPriceProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl FinnhubPriceProvider {
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

    fn build_candle_url(&self) -> String {
        format!("{}/stock/candle", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl PriceProvider for FinnhubPriceProvider {
    fn name(&self) -> &'static str {
        "finnhub"
    }

    async fn fetch_daily_closes(
        &self,
        req: &HistoryRequest,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        let now = Utc::now();
        let from = req
            .period
            .calendar_days()
            .map(|d| (now - chrono::Duration::days(d)).timestamp())
            .unwrap_or(0);
        let from_s = from.to_string();
        let to_s = now.timestamp().to_string();

        let resp = self
            .http
            .get(self.build_candle_url())
            .query(&[
                ("symbol", req.symbol.as_str()),
                ("resolution", "D"),
                ("from", from_s.as_str()),
                ("to", to_s.as_str()),
                ("token", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let candles: CandleResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Decode(format!("finnhub json decode failed: {e}")))?;

        let mut norm = CloseNormalizer::new();
        for p in candles.into_points() {
            norm.push(p);
        }
        let (points, report) = norm.finish(req.period.trading_days());
        tracing::debug!(
            provider = self.name(),
            symbol = %req.symbol,
            period = %req.period,
            rows_read = report.rows_read,
            rows_ok = report.rows_ok,
            "daily closes normalised"
        );
        Ok(points)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CandleResponse {
    s: Option<String>,
    #[serde(default)]
    t: Vec<i64>,
    #[serde(default)]
    c: Vec<f64>,
}

impl CandleResponse {
    fn into_points(self) -> Vec<PricePoint> {
        if self.s.as_deref() != Some("ok") || self.t.is_empty() || self.t.len() != self.c.len() {
            return Vec::new();
        }
        self.t
            .into_iter()
            .zip(self.c)
            .filter_map(|(ts, close)| {
                DateTime::<Utc>::from_timestamp(ts, 0)
                    .map(|dt| PricePoint::new(dt.date_naive(), close))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn candles(json: &str) -> CandleResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn ok_candles_become_points() {
        // 2024-03-01 and 2024-03-04, 00:00 UTC
        let pts =
            candles(r#"{"s":"ok","t":[1709251200,1709510400],"c":[10.5,11.0]}"#).into_points();
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(pts[1].close, 11.0);
    }

    #[test]
    fn no_data_is_empty() {
        assert!(candles(r#"{"s":"no_data"}"#).into_points().is_empty());
    }

    #[test]
    fn mismatched_arrays_are_empty() {
        let pts = candles(r#"{"s":"ok","t":[1709251200,1709510400],"c":[10.5]}"#).into_points();
        assert!(pts.is_empty());
    }
}
