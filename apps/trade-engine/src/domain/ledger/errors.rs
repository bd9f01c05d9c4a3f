//! Ledger Errors
//!
//! Every variant describes an inconsistent ledger: data that cannot be replayed
//! without silently coercing it. They are fatal for the trade being replayed.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::shared::{ContractId, StatementId};

use super::value_objects::{SecType, StatementKind};

/// Errors raised while building contracts or replaying statements.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A statement references a contract that is not known.
    #[error("Inconsistent ledger: statement {statement_id} references unknown contract {contract_id}")]
    UnknownContract {
        /// Offending statement.
        statement_id: StatementId,
        /// Missing contract.
        contract_id: ContractId,
    },

    /// An option contract is missing one of its terms.
    #[error("Inconsistent ledger: option contract {contract_id} is missing its {field}")]
    MissingOptionTerms {
        /// Contract being built.
        contract_id: ContractId,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A non-option contract carries option terms.
    #[error("Inconsistent ledger: {sec_type} contract {contract_id} carries option terms")]
    UnexpectedOptionTerms {
        /// Contract being built.
        contract_id: ContractId,
        /// Its security type.
        sec_type: SecType,
    },

    /// Option terms are present but invalid (non-positive strike or multiplier).
    #[error("Inconsistent ledger: option contract {contract_id} has invalid terms: {message}")]
    InvalidOptionTerms {
        /// Contract being built.
        contract_id: ContractId,
        /// Description of the problem.
        message: String,
    },

    /// The statement kind does not match the referenced contract's security type.
    #[error("Inconsistent ledger: {kind} statement {statement_id} references a {sec_type} contract")]
    KindMismatch {
        /// Offending statement.
        statement_id: StatementId,
        /// Statement kind.
        kind: StatementKind,
        /// Contract security type.
        sec_type: SecType,
    },

    /// A single fill moved a leg from long to short (or back) without closing it first.
    #[error(
        "Inconsistent ledger: statement {statement_id} flips contract {contract_id} from {before} to {after} without closing"
    )]
    SignFlip {
        /// Offending statement.
        statement_id: StatementId,
        /// Affected leg.
        contract_id: ContractId,
        /// Quantity before the fill.
        before: Decimal,
        /// Quantity after the fill.
        after: Decimal,
    },

    /// The FX rate to base currency is not positive.
    #[error("Inconsistent ledger: statement {statement_id} has non-positive fx rate {rate}")]
    InvalidFxRate {
        /// Offending statement.
        statement_id: StatementId,
        /// The supplied rate.
        rate: Decimal,
    },
}
