//! Trade Bounded Context
//!
//! The trade aggregate and its recomputation from the statement ledger.
//!
//! # Lifecycle
//!
//! ```text
//! Undefined ──fill──> Open ──all flat + close──> Closed
//!                      ^                           │
//!                      └───────leg reopened────────┘
//! ```

pub mod aggregate;
pub mod aggregator;
pub mod errors;
pub mod summary;
pub mod windows;

pub use aggregate::{Trade, TradeStatus};
pub use aggregator::TradeAggregator;
pub use errors::TradeError;
pub use summary::{RecomputeMode, TradeSummary};
pub use windows::{DEFAULT_ADJUSTMENT_WINDOW_MINUTES, adjustment_windows};
