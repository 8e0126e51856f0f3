//! HTTP error mapping.
//!
//! | failure                         | status |
//! |---------------------------------|--------|
//! | bad query / `InvalidConfig`     | 422    |
//! | `InsufficientReturns`           | 400    |
//! | `InsufficientHistory`           | 404    |
//! | price provider failure          | 502    |
//! | simulation task failure         | 500    |

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mcn_md::ProviderError;
use mcn_sim::SimError;

use crate::api_types::ErrorResponse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "invalid_query", message)
    }

    pub fn price_provider(provider: &str, err: &ProviderError) -> Self {
        Self::new(
            StatusCode::BAD_GATEWAY,
            "price_provider",
            format!("price provider error ({provider}): {err}"),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.status.as_u16(),
            self.kind,
            self.message
        )
    }
}

impl std::error::Error for ApiError {}

impl From<SimError> for ApiError {
    fn from(e: SimError) -> Self {
        let status = match e {
            SimError::InvalidConfig { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            SimError::InsufficientHistory { .. } => StatusCode::NOT_FOUND,
            SimError::InsufficientReturns { .. } => StatusCode::BAD_REQUEST,
        };
        Self::new(status, e.kind(), e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
                kind: self.kind.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_errors_map_to_statuses() {
        let e: ApiError = SimError::InsufficientHistory {
            required: 30,
            available: 29,
        }
        .into();
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.kind, "insufficient_history");

        let e: ApiError = SimError::InsufficientReturns {
            required: 20,
            available: 3,
        }
        .into();
        assert_eq!(e.status, StatusCode::BAD_REQUEST);

        let e: ApiError = SimError::InvalidConfig {
            message: "alpha".to_string(),
        }
        .into();
        assert_eq!(e.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(e.kind, "invalid_config");
    }

    #[test]
    fn provider_error_is_bad_gateway() {
        let e = ApiError::price_provider(
            "alphavantage",
            &ProviderError::Transport("timeout".to_string()),
        );
        assert_eq!(e.status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            e.message,
            "price provider error (alphavantage): transport error: timeout"
        );
    }
}
