//! Bounded keyed queue that coalesces pending updates.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use thiserror::Error;

/// Queue errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// No room for a new key.
    #[error("Queue full ({capacity} pending keys)")]
    Full {
        /// Queue capacity.
        capacity: usize,
    },
}

/// Result of a successful push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The key was not pending and joined the back of the queue.
    Enqueued,
    /// The key was pending; its value was replaced in place.
    Coalesced,
}

/// FIFO over keys where each key is pending at most once.
///
/// Pushing a pending key replaces its value without moving it, so a burst of
/// updates for one account costs a single slot and a single processing pass.
#[derive(Debug)]
pub struct CoalescingQueue<K, V> {
    order: VecDeque<K>,
    pending: HashMap<K, V>,
    capacity: usize,
}

impl<K, V> CoalescingQueue<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a queue holding at most `capacity` keys.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            pending: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a value for `key`.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Full` when `key` is not pending and the queue is
    /// at capacity.
    pub fn push(&mut self, key: K, value: V) -> Result<PushOutcome, QueueError> {
        if let Some(slot) = self.pending.get_mut(&key) {
            *slot = value;
            return Ok(PushOutcome::Coalesced);
        }
        if self.order.len() >= self.capacity {
            return Err(QueueError::Full {
                capacity: self.capacity,
            });
        }
        self.order.push_back(key.clone());
        self.pending.insert(key, value);
        Ok(PushOutcome::Enqueued)
    }

    /// Remove the oldest pending key and its latest value.
    pub fn pop(&mut self) -> Option<(K, V)> {
        while let Some(key) = self.order.pop_front() {
            if let Some(value) = self.pending.remove(&key) {
                return Some((key, value));
            }
        }
        None
    }

    /// Whether `key` is pending.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Number of pending keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Maximum number of pending keys.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
