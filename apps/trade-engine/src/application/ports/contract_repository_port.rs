//! Contract Repository Port (Driven Port)

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::ledger::ContractDescriptor;
use crate::domain::shared::ContractId;

use super::RepositoryError;

/// Port for contract reference data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContractRepositoryPort: Send + Sync {
    /// Look up contracts by id. Unknown ids are absent from the result.
    async fn find_many(
        &self,
        ids: &[ContractId],
    ) -> Result<HashMap<ContractId, ContractDescriptor>, RepositoryError>;
}
