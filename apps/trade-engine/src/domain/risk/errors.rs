//! Combo risk errors.

use thiserror::Error;

use crate::domain::ledger::SecType;
use crate::domain::shared::ContractId;

/// Errors raised by the combo risk analyzer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RiskError {
    /// The leg's security type has no settlement payoff model.
    #[error("Unsupported leg type {sec_type} for contract {contract_id}")]
    UnsupportedLegType {
        /// Offending leg.
        contract_id: ContractId,
        /// Its security type.
        sec_type: SecType,
    },
}
