//! Strategy classification errors.

use thiserror::Error;

use crate::domain::ledger::SecType;
use crate::domain::shared::ContractId;

/// Errors raised by the strategy classifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StrategyError {
    /// The leg's security type has no classification bucket.
    #[error("Unsupported leg type {sec_type} for contract {contract_id}")]
    UnsupportedLegType {
        /// Offending leg.
        contract_id: ContractId,
        /// Its security type.
        sec_type: SecType,
    },
}
