//! Quote Provider Port (Driven Port)
//!
//! Latest observed prices. Quotes are display only and never feed risk.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::shared::ContractId;

use super::RepositoryError;

/// Port for last-price lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteProviderPort: Send + Sync {
    /// Latest price per contract. Contracts without a quote are absent.
    async fn latest_prices(
        &self,
        ids: &[ContractId],
    ) -> Result<HashMap<ContractId, Decimal>, RepositoryError>;
}
