//! Structured error handling for the trade engine.
//!
//! Domain errors are converted into an [`EngineError`] carrying a stable
//! [`ErrorCode`] and key-value context, so failures of one trade can be
//! reported without aborting others.
//!
//! # Error Codes
//!
//! | Code | Recoverable | Usage |
//! |------|-------------|-------|
//! | `UNSUPPORTED_LEG_TYPE` | no | Leg security type has no risk/strategy model |
//! | `CONVERGENCE_ERROR` | yes | IV solver failed; fallback volatility applies |
//! | `INCONSISTENT_LEDGER` | no | Ledger cannot be replayed |
//! | `INVALID_INPUT` | no | Pricing inputs outside the model domain |
//! | `TRADE_NOT_FOUND` | no | Unknown trade id |
//! | `REPOSITORY_ERROR` | yes | Storage adapter failure |
//! | `INTERNAL_ERROR` | no | Unexpected failure |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::RepositoryError;
use crate::domain::shared::TradeId;
use crate::domain::trade::TradeError;
use crate::pricing::PricingError;

/// Error codes for the trade engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Leg security type without a payoff or classification model.
    UnsupportedLegType,
    /// Implied volatility did not converge.
    ConvergenceError,
    /// Ledger data that cannot be replayed.
    InconsistentLedger,
    /// Pricing inputs outside the model domain.
    InvalidInput,
    /// Trade not found.
    TradeNotFound,
    /// Storage adapter failure.
    RepositoryError,
    /// Internal error.
    InternalError,
}

impl ErrorCode {
    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::UnsupportedLegType => "UNSUPPORTED_LEG_TYPE",
            Self::ConvergenceError => "CONVERGENCE_ERROR",
            Self::InconsistentLedger => "INCONSISTENT_LEDGER",
            Self::InvalidInput => "INVALID_INPUT",
            Self::TradeNotFound => "TRADE_NOT_FOUND",
            Self::RepositoryError => "REPOSITORY_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether retrying or falling back can succeed without new data.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::ConvergenceError | Self::RepositoryError)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A rich error with context for the trade engine.
#[derive(Debug, Error)]
pub struct EngineError {
    /// Error code.
    code: ErrorCode,
    /// Human-readable message.
    message: String,
    /// Additional context (key-value pairs).
    context: Vec<(String, String)>,
}

impl EngineError {
    /// Create a new engine error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Convert to a serializable error report.
    #[must_use]
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code.reason().to_string(),
            message: self.message.clone(),
            recoverable: self.code.is_recoverable(),
            details: self.context.iter().cloned().collect(),
        }
    }

    /// Trade not found.
    #[must_use]
    pub fn trade_not_found(trade_id: TradeId) -> Self {
        Self::new(
            ErrorCode::TradeNotFound,
            format!("Trade {trade_id} not found"),
        )
        .with_context("trade_id", trade_id.to_string())
    }

    /// Internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.reason(), self.message)
    }
}

/// Serializable error body, e.g. for the binary's failure report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Whether the failure is recoverable.
    pub recoverable: bool,
    /// Additional details.
    pub details: HashMap<String, String>,
}

impl From<TradeError> for EngineError {
    fn from(err: TradeError) -> Self {
        let code = match &err {
            TradeError::Ledger(_) | TradeError::ForeignStatement { .. } => {
                ErrorCode::InconsistentLedger
            }
            TradeError::Risk(_) | TradeError::Strategy(_) => ErrorCode::UnsupportedLegType,
        };
        Self::new(code, err.to_string())
    }
}

impl From<PricingError> for EngineError {
    fn from(err: PricingError) -> Self {
        let code = match &err {
            PricingError::InvalidInput { .. } => ErrorCode::InvalidInput,
            PricingError::Convergence { .. } | PricingError::DegenerateVolatility { .. } => {
                ErrorCode::ConvergenceError
            }
        };
        Self::new(code, err.to_string())
    }
}

impl From<RepositoryError> for EngineError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::TradeNotFound(trade_id) => Self::trade_not_found(trade_id),
            other => Self::new(ErrorCode::RepositoryError, other.to_string()),
        }
    }
}
