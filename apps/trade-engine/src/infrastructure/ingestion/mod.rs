//! Broker Data Ingestion
//!
//! Producers submit keyed updates on priority lanes; a single worker drains
//! them one at a time. Repeated updates for a pending key are coalesced.

mod queue;
mod scheduler;
mod worker;

pub use queue::{CoalescingQueue, PushOutcome, QueueError};
pub use scheduler::{IngestionLane, IngestionScheduler};
pub use worker::{IngestionHandle, run_ingestion_worker};
