//! Repository Error
//!
//! Failure shared by every storage port.

use thiserror::Error;

use crate::domain::shared::{StatementId, TradeId};

/// Storage adapter failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// No trade with this id.
    #[error("Trade {0} not found")]
    TradeNotFound(TradeId),

    /// No statement with this id.
    #[error("Statement {0} not found")]
    StatementNotFound(StatementId),

    /// A statement with this id already exists. Statements are immutable.
    #[error("Statement {0} already recorded")]
    DuplicateStatement(StatementId),

    /// The backing store could not be reached.
    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}
