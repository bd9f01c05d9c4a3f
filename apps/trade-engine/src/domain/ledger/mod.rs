//! Ledger Bounded Context
//!
//! Contracts, append-only statement rows, and the replay that turns them into
//! virtual legs.
//!
//! # Invariants
//!
//! - Statements are immutable; corrections arrive as new rows
//! - A leg whose quantity returns to zero has exactly zero cost basis
//! - A single fill never flips a leg from long to short

pub mod errors;
pub mod services;
pub mod value_objects;

pub use errors::LedgerError;
pub use services::{LedgerReplay, LegMap, replay};
pub use value_objects::{
    CashFlow, ContractDescriptor, DEFAULT_OPTION_MULTIPLIER, Fill, OptionRight, OptionTerms,
    SecType, StatementDetail, StatementEvent, StatementKind, VirtualLeg, sorted_by_ledger_order,
};
