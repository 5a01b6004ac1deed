//! Interval polling of a mounted adventurer's queries.
//!
//! Mounting spawns a task that refetches immediately and then once per
//! interval. The returned [`PollHandle`] is the mount: dropping or unmounting
//! it stops the timer, and any fetch still in flight at that moment is
//! discarded on arrival. The poller also stops by itself once the store is
//! reset, since every later result would be stale.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use survivor_core::AdventurerId;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::{FetchGuard, QueryClient, RefetchSummary};

/// Default refetch interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollError {
    #[error("Poller for adventurer {0} is no longer mounted")]
    Unmounted(AdventurerId),
}

type RefetchRequest = oneshot::Sender<RefetchSummary>;

/// Spawns pollers.
pub struct QueryPoller;

impl QueryPoller {
    /// Start polling `adventurer_id` every `interval`.
    ///
    /// The poller is bound to the store generation at mount time.
    pub fn mount(client: QueryClient, adventurer_id: AdventurerId, interval: Duration) -> PollHandle {
        let live = Arc::new(AtomicBool::new(true));
        let guard = FetchGuard::with_liveness(client.generation(), Arc::clone(&live));
        let (stop_tx, stop_rx) = watch::channel(false);
        let (refetch_tx, refetch_rx) = mpsc::channel(8);

        tracing::info!(adventurer_id, interval_ms = interval.as_millis() as u64, "Mounting query poller");

        let task = tokio::spawn(run(
            client,
            adventurer_id,
            interval,
            guard,
            stop_rx,
            refetch_rx,
        ));

        PollHandle {
            adventurer_id,
            live,
            stop_tx,
            refetch_tx,
            task,
        }
    }
}

async fn run(
    client: QueryClient,
    adventurer_id: AdventurerId,
    interval: Duration,
    guard: FetchGuard,
    mut stop_rx: watch::Receiver<bool>,
    mut refetch_rx: mpsc::Receiver<RefetchRequest>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let summary = tokio::select! {
            biased;

            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
                continue;
            }
            Some(reply) = refetch_rx.recv() => {
                let summary = client.refetch_guarded(adventurer_id, &guard).await;
                // The caller may have given up waiting.
                let _ = reply.send(summary.clone());
                ticker.reset();
                summary
            }
            _ = ticker.tick() => client.refetch_guarded(adventurer_id, &guard).await,
        };

        if guard.generation() != client.generation() {
            tracing::debug!(adventurer_id, "Query store was reset; stopping poller");
            break;
        }
        if summary.failed().next().is_some() {
            tracing::debug!(adventurer_id, "Poll round had failures; retrying next interval");
        }
    }

    tracing::info!(adventurer_id, "Query poller stopped");
}

/// A mounted poller.
pub struct PollHandle {
    adventurer_id: AdventurerId,
    live: Arc<AtomicBool>,
    stop_tx: watch::Sender<bool>,
    refetch_tx: mpsc::Sender<RefetchRequest>,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn adventurer_id(&self) -> AdventurerId {
        self.adventurer_id
    }

    /// Whether results are still being applied.
    pub fn is_mounted(&self) -> bool {
        self.live.load(Ordering::Acquire) && !self.task.is_finished()
    }

    /// Refetch now instead of waiting for the next tick.
    pub async fn refetch(&self) -> Result<RefetchSummary, PollError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.refetch_tx
            .send(reply_tx)
            .await
            .map_err(|_| PollError::Unmounted(self.adventurer_id))?;
        reply_rx
            .await
            .map_err(|_| PollError::Unmounted(self.adventurer_id))
    }

    /// Stop polling and drop any result still in flight.
    pub fn unmount(self) {
        // Drop does the work.
    }

    fn stop(&self) {
        self.live.store(false, Ordering::Release);
        let _ = self.stop_tx.send(true);
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use survivor_core::{Adventurer, Item};

    use super::*;
    use crate::mock::MockSource;
    use crate::queries::QueryKind;

    fn source_with_adventurer() -> MockSource {
        let source = MockSource::new();
        source.set_adventurer(Adventurer {
            id: 1,
            health: 100,
            ..Adventurer::default()
        });
        source
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_on_mount_and_every_interval() {
        let source = source_with_adventurer();
        let client = QueryClient::new(Arc::new(source.clone()));
        let handle = QueryPoller::mount(client.clone(), 1, DEFAULT_POLL_INTERVAL);

        settle().await;
        assert_eq!(source.fetch_count(QueryKind::AdventurerById), 1);
        assert!(client.store().read(|s| s.adventurer().is_some()));

        tokio::time::sleep(DEFAULT_POLL_INTERVAL).await;
        settle().await;
        assert_eq!(source.fetch_count(QueryKind::AdventurerById), 2);

        handle.unmount();
    }

    #[tokio::test(start_paused = true)]
    async fn no_fetches_after_unmount() {
        let source = source_with_adventurer();
        let client = QueryClient::new(Arc::new(source.clone()));
        let handle = QueryPoller::mount(client, 1, DEFAULT_POLL_INTERVAL);
        settle().await;
        let before = source.total_fetches();

        handle.unmount();
        tokio::time::sleep(DEFAULT_POLL_INTERVAL * 2).await;
        settle().await;
        assert_eq!(source.total_fetches(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_result_is_dropped_after_unmount() {
        let source = source_with_adventurer();
        source.set_delay(Duration::from_millis(1000));
        let client = QueryClient::new(Arc::new(source.clone()));
        let handle = QueryPoller::mount(client.clone(), 1, DEFAULT_POLL_INTERVAL);

        settle().await;
        assert!(client.store().read(|s| s.is_loading()));
        handle.unmount();

        tokio::time::sleep(Duration::from_millis(2000)).await;
        settle().await;
        client.store().read(|s| {
            assert!(s.adventurer().is_none());
            assert!(!s.is_loading());
        });
    }

    #[tokio::test(start_paused = true)]
    async fn manual_refetch_returns_summary() {
        let source = source_with_adventurer();
        let client = QueryClient::new(Arc::new(source.clone()));
        let handle = QueryPoller::mount(client.clone(), 1, DEFAULT_POLL_INTERVAL);
        settle().await;

        source.set_items(vec![Item {
            id: 4,
            equipped_adventurer_id: Some(1),
            ..Item::default()
        }]);
        let summary = handle.refetch().await.unwrap();
        assert!(summary.is_complete());
        assert_eq!(client.store().read(|s| s.items().len()), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_stops_the_poller() {
        let source = source_with_adventurer();
        let client = QueryClient::new(Arc::new(source.clone()));
        let handle = QueryPoller::mount(client.clone(), 1, DEFAULT_POLL_INTERVAL);
        settle().await;

        client.reset();
        tokio::time::sleep(DEFAULT_POLL_INTERVAL).await;
        settle().await;

        assert!(!handle.is_mounted());
        assert_eq!(handle.refetch().await, Err(PollError::Unmounted(1)));
    }
}
