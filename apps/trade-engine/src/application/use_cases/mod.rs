//! Use Cases
//!
//! Application-specific orchestration of the trade domain.

mod ledger_ports;
mod recompute_all;
mod recompute_trade;

pub use ledger_ports::{LedgerPorts, TradeInputs};
pub use recompute_all::RecomputeAllTradesUseCase;
pub use recompute_trade::RecomputeTradeUseCase;
