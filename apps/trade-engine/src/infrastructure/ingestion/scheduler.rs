//! Priority lanes over coalescing queues.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::queue::{CoalescingQueue, PushOutcome, QueueError};

/// Kind of broker data being ingested, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestionLane {
    /// Executions and order updates.
    Orders,
    /// Position snapshots.
    Positions,
    /// Cash movements.
    Cash,
}

impl IngestionLane {
    /// Lanes in drain order.
    pub const PRIORITY: [Self; 3] = [Self::Orders, Self::Positions, Self::Cash];

    const fn index(self) -> usize {
        match self {
            Self::Orders => 0,
            Self::Positions => 1,
            Self::Cash => 2,
        }
    }
}

impl fmt::Display for IngestionLane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Orders => write!(f, "orders"),
            Self::Positions => write!(f, "positions"),
            Self::Cash => write!(f, "cash"),
        }
    }
}

/// One coalescing queue per lane.
#[derive(Debug)]
pub struct IngestionScheduler<K, V> {
    lanes: [CoalescingQueue<K, V>; 3],
}

impl<K, V> IngestionScheduler<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a scheduler whose lanes each hold `capacity` keys.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            lanes: [
                CoalescingQueue::new(capacity),
                CoalescingQueue::new(capacity),
                CoalescingQueue::new(capacity),
            ],
        }
    }

    /// Queue an update on a lane.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Full` when the lane has no room for a new key.
    pub fn push(&mut self, lane: IngestionLane, key: K, value: V) -> Result<PushOutcome, QueueError> {
        self.lanes[lane.index()].push(key, value)
    }

    /// Pop from the highest-priority non-empty lane.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<(IngestionLane, K, V)> {
        IngestionLane::PRIORITY.into_iter().find_map(|lane| {
            self.lanes[lane.index()]
                .pop()
                .map(|(key, value)| (lane, key, value))
        })
    }

    /// Pending keys on one lane.
    #[must_use]
    pub fn lane_len(&self, lane: IngestionLane) -> usize {
        self.lanes[lane.index()].len()
    }

    /// Pending keys across all lanes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lanes.iter().map(CoalescingQueue::len).sum()
    }

    /// Whether every lane is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.iter().all(CoalescingQueue::is_empty)
    }
}
