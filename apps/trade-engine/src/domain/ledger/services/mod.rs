//! Ledger services.

mod replay;

pub use replay::{LedgerReplay, LegMap, replay};
