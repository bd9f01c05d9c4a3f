//! Statement Repository Port (Driven Port)
//!
//! Append-only access to the statement ledger.

use async_trait::async_trait;

use crate::domain::ledger::StatementEvent;
use crate::domain::shared::{StatementId, TradeId};

use super::RepositoryError;

/// Port for the statement ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatementRepositoryPort: Send + Sync {
    /// All statements assigned to a trade, in no particular order.
    async fn list_for_trade(&self, trade_id: TradeId)
    -> Result<Vec<StatementEvent>, RepositoryError>;

    /// Record a new statement.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateStatement` if the id is already recorded.
    async fn append(&self, statement: StatementEvent) -> Result<(), RepositoryError>;

    /// Attach a statement to a trade.
    async fn assign_to_trade(
        &self,
        statement_id: StatementId,
        trade_id: TradeId,
    ) -> Result<(), RepositoryError>;
}
