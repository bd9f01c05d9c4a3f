//! Trade aggregation errors.

use thiserror::Error;

use crate::domain::ledger::LedgerError;
use crate::domain::risk::RiskError;
use crate::domain::shared::TradeId;
use crate::domain::strategy::StrategyError;

/// Errors raised while recomputing a trade.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TradeError {
    /// The ledger could not be replayed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Combo risk could not be computed.
    #[error(transparent)]
    Risk(#[from] RiskError),

    /// The legs could not be classified.
    #[error(transparent)]
    Strategy(#[from] StrategyError),

    /// A statement belongs to another trade.
    #[error("Statement for trade {found} passed to recomputation of trade {expected}")]
    ForeignStatement {
        /// Trade being recomputed.
        expected: TradeId,
        /// Trade the statement is assigned to.
        found: TradeId,
    },
}
