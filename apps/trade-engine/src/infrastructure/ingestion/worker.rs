//! Single-flight ingestion worker.

use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::queue::{PushOutcome, QueueError};
use super::scheduler::{IngestionLane, IngestionScheduler};

/// Shared handle used by producers to queue updates for the worker.
#[derive(Debug)]
pub struct IngestionHandle<K, V> {
    scheduler: Arc<Mutex<IngestionScheduler<K, V>>>,
    notify: Arc<Notify>,
}

impl<K, V> Clone for IngestionHandle<K, V> {
    fn clone(&self) -> Self {
        Self {
            scheduler: Arc::clone(&self.scheduler),
            notify: Arc::clone(&self.notify),
        }
    }
}

impl<K, V> IngestionHandle<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a handle over a fresh scheduler.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            scheduler: Arc::new(Mutex::new(IngestionScheduler::new(capacity))),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Queue an update and wake the worker.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Full` when the lane has no room for a new key.
    pub fn submit(&self, lane: IngestionLane, key: K, value: V) -> Result<PushOutcome, QueueError> {
        let outcome = self
            .scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(lane, key, value)?;
        self.notify.notify_one();
        Ok(outcome)
    }

    /// Pending updates across all lanes.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn take_next(&self) -> Option<(IngestionLane, K, V)> {
        self.scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next()
    }
}

/// Drain the scheduler one update at a time until `shutdown` fires.
///
/// `process` is awaited before the next update is taken, so at most one
/// update is in flight. Errors are logged and do not stop the worker.
/// Returns the number of updates processed.
pub async fn run_ingestion_worker<K, V, F, Fut, E>(
    handle: IngestionHandle<K, V>,
    shutdown: CancellationToken,
    mut process: F,
) -> usize
where
    K: Eq + Hash + Clone + Display,
    F: FnMut(IngestionLane, K, V) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let mut processed = 0;
    info!("Ingestion worker started");

    loop {
        if shutdown.is_cancelled() {
            break;
        }

        if let Some((lane, key, value)) = handle.take_next() {
            let label = key.to_string();
            if let Err(err) = process(lane, key, value).await {
                warn!(lane = %lane, key = %label, error = %err, "Ingestion update failed");
            }
            processed += 1;
            continue;
        }

        tokio::select! {
            () = handle.notify.notified() => {}
            () = shutdown.cancelled() => break,
        }
    }

    info!(processed, "Ingestion worker stopped");
    processed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    type Seen = Arc<Mutex<Vec<(IngestionLane, String, u32)>>>;

    fn recorder(
        seen: Seen,
        stop_after: usize,
        shutdown: CancellationToken,
    ) -> impl FnMut(IngestionLane, String, u32) -> std::future::Ready<Result<(), String>> {
        move |lane, key, value| {
            let mut rows = seen.lock().unwrap();
            rows.push((lane, key, value));
            if rows.len() >= stop_after {
                shutdown.cancel();
            }
            std::future::ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_worker_drains_by_priority_with_coalescing() {
        let handle = IngestionHandle::new(16);
        handle.submit(IngestionLane::Cash, "u1".to_string(), 1).unwrap();
        handle.submit(IngestionLane::Orders, "u1".to_string(), 2).unwrap();
        handle.submit(IngestionLane::Orders, "u1".to_string(), 3).unwrap();
        handle.submit(IngestionLane::Positions, "u2".to_string(), 4).unwrap();

        let shutdown = CancellationToken::new();
        let seen: Seen = Arc::default();
        let processed = run_ingestion_worker(
            handle.clone(),
            shutdown.clone(),
            recorder(Arc::clone(&seen), 3, shutdown.clone()),
        )
        .await;

        assert_eq!(processed, 3);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (IngestionLane::Orders, "u1".to_string(), 3),
                (IngestionLane::Positions, "u2".to_string(), 4),
                (IngestionLane::Cash, "u1".to_string(), 1),
            ]
        );
        assert_eq!(handle.pending(), 0);
    }

    #[tokio::test]
    async fn test_idle_worker_wakes_on_submit() {
        let handle: IngestionHandle<String, u32> = IngestionHandle::new(4);
        let shutdown = CancellationToken::new();
        let seen: Seen = Arc::default();

        let worker = tokio::spawn(run_ingestion_worker(
            handle.clone(),
            shutdown.clone(),
            recorder(Arc::clone(&seen), 1, shutdown.clone()),
        ));

        tokio::task::yield_now().await;
        handle.submit(IngestionLane::Positions, "u1".to_string(), 7).unwrap();

        let processed = tokio::time::timeout(Duration::from_secs(5), worker)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(processed, 1);
    }

    #[tokio::test]
    async fn test_failed_update_does_not_stop_worker() {
        let handle = IngestionHandle::new(4);
        handle.submit(IngestionLane::Orders, "bad".to_string(), 0).unwrap();
        handle.submit(IngestionLane::Orders, "good".to_string(), 1).unwrap();

        let shutdown = CancellationToken::new();
        let stop = shutdown.clone();
        let processed = run_ingestion_worker(handle, shutdown, move |_, key: String, _: u32| {
            let result = if key == "bad" {
                Err("malformed row".to_string())
            } else {
                stop.cancel();
                Ok(())
            };
            std::future::ready(result)
        })
        .await;

        assert_eq!(processed, 2);
    }

    #[tokio::test]
    async fn test_cancelled_worker_exits_immediately() {
        let handle: IngestionHandle<String, u32> = IngestionHandle::new(4);
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let processed = run_ingestion_worker(handle, shutdown, |_, _, _| {
            std::future::ready(Ok::<(), String>(()))
        })
        .await;

        assert_eq!(processed, 0);
    }
}
