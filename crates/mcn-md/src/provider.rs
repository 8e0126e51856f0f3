//! Provider boundary shared by the price and news adapters.
//!
//! Only the error type lives here. Concrete providers map every transport,
//! HTTP and payload failure into one of these variants; callers decide
//! whether the failure is fatal (prices) or degrades to a default (news).

use std::fmt;

/// Errors that a provider implementation may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Network or transport failure (connect, timeout, TLS).
    Transport(String),
    /// The upstream API returned an application-level error, including
    /// rate-limit notes and unknown symbols.
    Api { code: Option<i64>, message: String },
    /// A response payload could not be decoded.
    Decode(String),
    /// A required configuration value (e.g. API key) is missing or invalid.
    Config(String),
}

impl ProviderError {
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Transport(_) => "transport",
            ProviderError::Api { .. } => "api",
            ProviderError::Decode(_) => "decode",
            ProviderError::Config(_) => "config",
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Transport(msg) => write!(f, "transport error: {msg}"),
            ProviderError::Api {
                code: Some(c),
                message,
            } => write!(f, "provider api error code={c}: {message}"),
            ProviderError::Api {
                code: None,
                message,
            } => write!(f, "provider api error: {message}"),
            ProviderError::Decode(msg) => write!(f, "decode error: {msg}"),
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProviderError::Decode(e.to_string())
        } else {
            // reqwest errors embed the request URL, which carries the API key
            // as a query parameter.
            ProviderError::Transport(e.without_url().to_string())
        }
    }
}

/// Map a non-success HTTP status into an API error.
pub fn status_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
    let snippet: String = body.chars().take(200).collect();
    ProviderError::Api {
        code: Some(i64::from(status.as_u16())),
        message: if snippet.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("http error")
                .to_string()
        } else {
            snippet
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_display_api_with_code() {
        let err = ProviderError::Api {
            code: Some(429),
            message: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "provider api error code=429: rate limited");
        assert_eq!(err.kind(), "api");
    }

    #[test]
    fn provider_error_display_api_no_code() {
        let err = ProviderError::Api {
            code: None,
            message: "unknown symbol".to_string(),
        };
        assert_eq!(err.to_string(), "provider api error: unknown symbol");
    }

    #[test]
    fn provider_error_display_config() {
        let err = ProviderError::Config("ALPHAVANTAGE_API_KEY is not set".to_string());
        assert_eq!(
            err.to_string(),
            "config error: ALPHAVANTAGE_API_KEY is not set"
        );
    }

    #[test]
    fn status_error_falls_back_to_reason_phrase() {
        let err = status_error(reqwest::StatusCode::BAD_GATEWAY, "");
        assert_eq!(
            err,
            ProviderError::Api {
                code: Some(502),
                message: "Bad Gateway".to_string()
            }
        );
    }
}
