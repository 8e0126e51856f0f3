//! Error taxonomy for the simulation core.
//!
//! Every failure is local and synchronous and carries a human-readable
//! reason. Nothing here is retried.

use std::fmt;

/// Result alias used throughout `mcn-sim`.
pub type Result<T> = std::result::Result<T, SimError>;

/// Core-level refusal kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum SimError {
    /// Fewer usable price observations than the engine requires.
    InsufficientHistory { required: usize, available: usize },
    /// Fewer finite returns survived differencing than the engine requires.
    InsufficientReturns { required: usize, available: usize },
    /// A configuration value is outside its declared range.
    InvalidConfig { message: String },
}

impl SimError {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        SimError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SimError::InsufficientHistory { .. } => "insufficient_history",
            SimError::InsufficientReturns { .. } => "insufficient_returns",
            SimError::InvalidConfig { .. } => "invalid_config",
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InsufficientHistory {
                required,
                available,
            } => write!(
                f,
                "insufficient history: need at least {required} closing prices, got {available}"
            ),
            SimError::InsufficientReturns {
                required,
                available,
            } => write!(
                f,
                "insufficient returns: need at least {required} after differencing, got {available}"
            ),
            SimError::InvalidConfig { message } => write!(f, "invalid config: {message}"),
        }
    }
}

impl std::error::Error for SimError {}
