//! Persistence Adapters
//!
//! Storage implementations of the application ports.

mod in_memory;

pub use in_memory::{InMemoryLedgerStore, LedgerSnapshot};
