//! mcn-md
//!
//! Daily-close price providers.
//!
//! This crate owns the price-provider abstraction and the concrete HTTP
//! adapters. It hands clean, ascending [`PricePoint`]s to the caller and does
//! **not** decide whether the history is long enough to simulate.

pub mod alphavantage;
pub mod finnhub;
pub mod normalizer;
pub mod provider;

use std::fmt;
use std::str::FromStr;

use mcn_sim::PricePoint;

pub use alphavantage::AlphaVantagePriceProvider;
pub use finnhub::FinnhubPriceProvider;
pub use normalizer::{CloseNormalizer, NormalizeError, NormalizeReport};
pub use provider::ProviderError;

/// History window requested from a provider.
///
/// Canonical values: `1mo | 3mo | 6mo | 1y | 2y | 5y | max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Period {
    M1,
    M3,
    M6,
    Y1,
    #[default]
    Y2,
    Y5,
    Max,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::M1 => "1mo",
            Period::M3 => "3mo",
            Period::M6 => "6mo",
            Period::Y1 => "1y",
            Period::Y2 => "2y",
            Period::Y5 => "5y",
            Period::Max => "max",
        }
    }

    /// Trading-day lookback; `None` keeps everything the provider returns.
    pub fn trading_days(&self) -> Option<usize> {
        match self {
            Period::M1 => Some(21),
            Period::M3 => Some(63),
            Period::M6 => Some(126),
            Period::Y1 => Some(252),
            Period::Y2 => Some(504),
            Period::Y5 => Some(1260),
            Period::Max => None,
        }
    }

    /// Calendar-day span for providers that take a `from` timestamp.
    pub fn calendar_days(&self) -> Option<i64> {
        match self {
            Period::M1 => Some(31),
            Period::M3 => Some(92),
            Period::M6 => Some(183),
            Period::Y1 => Some(366),
            Period::Y2 => Some(731),
            Period::Y5 => Some(1827),
            Period::Max => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1mo" => Ok(Period::M1),
            "3mo" => Ok(Period::M3),
            "6mo" => Ok(Period::M6),
            "1y" => Ok(Period::Y1),
            "2y" => Ok(Period::Y2),
            "5y" => Ok(Period::Y5),
            "max" => Ok(Period::Max),
            other => Err(format!(
                "invalid period '{other}'. expected one of: 1mo | 3mo | 6mo | 1y | 2y | 5y | max"
            )),
        }
    }
}

/// Fetch request for a [`PriceProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    /// Upper-cased ticker (e.g. `"AAPL"`).
    pub symbol: String,
    pub period: Period,
}

impl HistoryRequest {
    pub fn new(symbol: impl Into<String>, period: Period) -> Self {
        Self {
            symbol: symbol.into(),
            period,
        }
    }
}

/// Daily-close provider contract.
///
/// Implementations return the most recent `period` closes sorted ascending,
/// already normalised. Any transport, HTTP or payload failure is a
/// [`ProviderError`].
#[async_trait::async_trait]
pub trait PriceProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_daily_closes(
        &self,
        req: &HistoryRequest,
    ) -> Result<Vec<PricePoint>, ProviderError>;
}

/// Stand-in used when no API key is available: every fetch fails with
/// [`ProviderError::Config`].
#[derive(Debug, Clone)]
pub struct UnconfiguredPriceProvider {
    reason: String,
}

impl UnconfiguredPriceProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait::async_trait]
impl PriceProvider for UnconfiguredPriceProvider {
    fn name(&self) -> &'static str {
        "unconfigured"
    }

    async fn fetch_daily_closes(
        &self,
        _req: &HistoryRequest,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        Err(ProviderError::Config(self.reason.clone()))
    }
}

/// Run provider rows through a [`CloseNormalizer`] and trim to `period`.
pub(crate) fn normalize_rows<I, D, C>(
    provider: &str,
    req: &HistoryRequest,
    rows: I,
) -> Vec<PricePoint>
where
    I: IntoIterator<Item = (D, C)>,
    D: AsRef<str>,
    C: AsRef<str>,
{
    let mut norm = CloseNormalizer::new();
    for (date, close) in rows {
        norm.push_raw(date.as_ref(), close.as_ref());
    }
    let (points, report) = norm.finish(req.period.trading_days());
    tracing::debug!(
        provider,
        symbol = %req.symbol,
        period = %req.period,
        rows_read = report.rows_read,
        rows_ok = report.rows_ok,
        rows_rejected = report.rows_rejected,
        duplicates_dropped = report.duplicates_dropped,
        "daily closes normalised"
    );
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_parse() {
        assert_eq!("2y".parse::<Period>().unwrap(), Period::Y2);
        assert_eq!(" 6MO ".parse::<Period>().unwrap(), Period::M6);
        assert_eq!("max".parse::<Period>().unwrap(), Period::Max);
        assert!("10y".parse::<Period>().is_err());
        assert_eq!(Period::default(), Period::Y2);
    }

    #[test]
    fn period_lookbacks() {
        assert_eq!(Period::M1.trading_days(), Some(21));
        assert_eq!(Period::Y1.trading_days(), Some(252));
        assert_eq!(Period::Y5.trading_days(), Some(1260));
        assert_eq!(Period::Max.trading_days(), None);
        for p in [
            Period::M1, Period::M3, Period::M6, Period::Y1, Period::Y2, Period::Y5,
        ] {
            assert_eq!(p.as_str().parse::<Period>().unwrap(), p);
        }
    }

    #[tokio::test]
    async fn unconfigured_provider_refuses_with_config_error() {
        let p: Box<dyn PriceProvider> =
            Box::new(UnconfiguredPriceProvider::new("ALPHAVANTAGE_API_KEY is not set"));
        let err = p
            .fetch_daily_closes(&HistoryRequest::new("AAPL", Period::Y2))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "config");
        assert_eq!(
            err.to_string(),
            "config error: ALPHAVANTAGE_API_KEY is not set"
        );
    }
}
