//! Ledger value objects.

mod contract;
mod statement;
mod virtual_leg;

pub use contract::{
    ContractDescriptor, DEFAULT_OPTION_MULTIPLIER, OptionRight, OptionTerms, SecType,
};
pub use statement::{
    CashFlow, Fill, StatementDetail, StatementEvent, StatementKind, sorted_by_ledger_order,
};
pub use virtual_leg::VirtualLeg;
