//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer:
//!
//! - `persistence/`: in-memory ledger store and JSON snapshots
//! - `ingestion/`: prioritized, coalescing intake of broker updates

pub mod ingestion;
pub mod persistence;
