//! Alpha Vantage `TIME_SERIES_DAILY` adapter.

use std::fmt;
use std::time::Duration;

use mcn_sim::PricePoint;
use serde_json::Value;

use crate::provider::{status_error, ProviderError};
use crate::{normalize_rows, HistoryRequest, PriceProvider};

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

/// Payload keys Alpha Vantage uses for application errors and rate limits.
const ERROR_KEYS: [&str; 3] = ["Error Message", "Note", "Information"];
const SERIES_KEY: &str = "Time Series (Daily)";
const CLOSE_KEY: &str = "4. close";

/// Daily closes from the free `TIME_SERIES_DAILY` endpoint.
///
/// `compact` output (about 100 sessions) unless `full_output` is set; the
/// free tier rejects `full`.
#[derive(Clone)]
pub struct AlphaVantagePriceProvider {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
    full_output: bool,
}

impl fmt::Debug for AlphaVantagePriceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphaVantagePriceProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("full_output", &self.full_output)
            .finish()
    }
}

impl AlphaVantagePriceProvider {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, ProviderError> {
        Self::new_with_base_url(api_key, DEFAULT_BASE_URL.to_string(), timeout)
    }

    pub fn new_with_base_url(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::Config("alphavantage api key is empty".to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Config(format!("http client build failed: {e}")))?;
        Ok(Self {
            api_key,
            http,
            base_url,
            full_output: false,
        })
    }

    pub fn with_full_output(mut self, full_output: bool) -> Self {
        self.full_output = full_output;
        self
    }

    fn build_query_url(&self) -> String {
        format!("{}/query", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl PriceProvider for AlphaVantagePriceProvider {
    fn name(&self) -> &'static str {
        "alphavantage"
    }

    async fn fetch_daily_closes(
        &self,
        req: &HistoryRequest,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        let outputsize = if self.full_output { "full" } else { "compact" };
        let resp = self
            .http
            .get(self.build_query_url())
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", req.symbol.as_str()),
                ("apikey", self.api_key.as_str()),
                ("outputsize", outputsize),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Decode(format!("alphavantage json decode failed: {e}")))?;
        let rows = parse_daily_series(&payload)?;

        Ok(normalize_rows(self.name(), req, rows))
    }
}

/// Extract `(date, close)` rows from a `TIME_SERIES_DAILY` payload.
fn parse_daily_series(payload: &Value) -> Result<Vec<(&str, &str)>, ProviderError> {
    for key in ERROR_KEYS {
        if let Some(msg) = payload.get(key) {
            let message = msg
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| msg.to_string());
            return Err(ProviderError::Api {
                code: None,
                message: format!("alphavantage '{key}': {message}"),
            });
        }
    }

    let series = payload
        .get(SERIES_KEY)
        .and_then(Value::as_object)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| {
            let keys: Vec<&str> = payload
                .as_object()
                .map(|m| m.keys().map(String::as_str).collect())
                .unwrap_or_default();
            ProviderError::Decode(format!("alphavantage unexpected payload keys: {keys:?}"))
        })?;

    let rows: Vec<(&str, &str)> = series
        .iter()
        .filter_map(|(date, fields)| {
            fields
                .get(CLOSE_KEY)
                .and_then(Value::as_str)
                .map(|close| (date.as_str(), close))
        })
        .collect();

    if rows.is_empty() {
        return Err(ProviderError::Decode(
            "alphavantage returned a time series without close values".to_string(),
        ));
    }
    Ok(rows)
}
