//! Trade Repository Port (Driven Port)
//!
//! Persistence for trade aggregates and their last-known-good summary.

use async_trait::async_trait;

use crate::domain::shared::TradeId;
use crate::domain::trade::Trade;

use super::RepositoryError;

/// Port for trade persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeRepositoryPort: Send + Sync {
    /// Find a trade by id.
    async fn find_by_id(&self, trade_id: TradeId) -> Result<Option<Trade>, RepositoryError>;

    /// Insert or replace a trade.
    async fn save(&self, trade: &Trade) -> Result<(), RepositoryError>;

    /// Ids of every stored trade, ascending.
    async fn list_ids(&self) -> Result<Vec<TradeId>, RepositoryError>;
}
