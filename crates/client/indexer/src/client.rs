//! Fetch queries and apply their results to the store.
//!
//! A [`QueryClient`] is the only writer of the [`QueryStore`]. Every fetch is
//! tagged with a [`FetchGuard`] captured before the request goes out; when the
//! result comes back it is applied only if the store generation still matches
//! and the owning poller (if any) is still mounted.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use survivor_core::{AdventurerId, BeastId};

use crate::queries::{QueryData, QueryKind, QueryRequest};
use crate::shared::{SharedStore, StoreReader};
use crate::source::{ReadModelSource, SourceError};
use crate::store::{ApplyOutcome, QueryStore};

/// Notification emitted after a fetch result was applied or dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryUpdate {
    pub kind: QueryKind,
    pub generation: u64,
    pub outcome: ApplyOutcome,
    pub error: Option<String>,
}

/// Receives a [`QueryUpdate`] for every finished fetch.
pub trait QueryObserver: Send + Sync {
    fn on_update(&self, update: &QueryUpdate);
}

/// Conditions under which a fetch result may still be applied.
#[derive(Debug, Clone)]
pub struct FetchGuard {
    generation: u64,
    live: Option<Arc<AtomicBool>>,
}

impl FetchGuard {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            live: None,
        }
    }

    /// Guard that also requires `live` to be set when the result arrives.
    pub fn with_liveness(generation: u64, live: Arc<AtomicBool>) -> Self {
        Self {
            generation,
            live: Some(live),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_live(&self) -> bool {
        self.live
            .as_ref()
            .is_none_or(|live| live.load(Ordering::Acquire))
    }
}

/// Per-query outcomes of one refetch round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefetchSummary {
    pub outcomes: Vec<(QueryKind, ApplyOutcome)>,
    /// Beast the dependent queries were fetched for.
    pub beast_id: Option<BeastId>,
}

impl RefetchSummary {
    pub fn outcome(&self, kind: QueryKind) -> Option<ApplyOutcome> {
        self.outcomes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, outcome)| *outcome)
    }

    /// Every query fetched and applied.
    pub fn is_complete(&self) -> bool {
        !self.outcomes.is_empty()
            && self
                .outcomes
                .iter()
                .all(|(_, outcome)| *outcome == ApplyOutcome::Updated)
    }

    /// Some result was dropped because its guard no longer held.
    pub fn is_stale(&self) -> bool {
        self.outcomes
            .iter()
            .any(|(_, outcome)| *outcome == ApplyOutcome::Stale)
    }

    pub fn failed(&self) -> impl Iterator<Item = QueryKind> + '_ {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == ApplyOutcome::Failed)
            .map(|(kind, _)| *kind)
    }
}

/// Fetches read-model queries into a shared [`QueryStore`].
#[derive(Clone)]
pub struct QueryClient {
    source: Arc<dyn ReadModelSource>,
    store: SharedStore<QueryStore>,
    observer: Option<Arc<dyn QueryObserver>>,
}

impl QueryClient {
    pub fn new(source: Arc<dyn ReadModelSource>) -> Self {
        Self {
            source,
            store: SharedStore::new(QueryStore::new()),
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn QueryObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Read-only view of the store.
    pub fn store(&self) -> StoreReader<QueryStore> {
        self.store.reader()
    }

    pub fn generation(&self) -> u64 {
        self.store.read(QueryStore::generation)
    }

    /// Guard for fetches issued now.
    pub fn guard(&self) -> FetchGuard {
        FetchGuard::new(self.generation())
    }

    /// Clear all queries and invalidate in-flight results.
    pub fn reset(&self) {
        self.store.update(QueryStore::reset);
        tracing::debug!("Query store reset");
    }

    /// Fetch one query and apply its result under `guard`.
    pub async fn fetch(&self, request: QueryRequest, guard: &FetchGuard) -> ApplyOutcome {
        let kind = request.kind();
        if !guard.is_live() || !self.store.update(|s| s.begin(kind, guard.generation())) {
            return ApplyOutcome::Stale;
        }

        let result = self.source.fetch(&request).await;
        self.finish(kind, guard, result)
    }

    /// Apply data produced locally rather than fetched.
    fn settle(&self, kind: QueryKind, guard: &FetchGuard, data: QueryData) -> ApplyOutcome {
        if !guard.is_live() {
            return ApplyOutcome::Stale;
        }
        self.finish(kind, guard, Ok(data))
    }

    fn finish(
        &self,
        kind: QueryKind,
        guard: &FetchGuard,
        result: Result<QueryData, SourceError>,
    ) -> ApplyOutcome {
        let error = result.as_ref().err().map(ToString::to_string);

        let outcome = if guard.is_live() {
            self.store
                .update(|s| s.apply(kind, guard.generation(), result))
        } else {
            self.store.update(|s| s.abandon(kind, guard.generation()));
            ApplyOutcome::Stale
        };

        match outcome {
            ApplyOutcome::Updated => tracing::trace!(query = %kind, "Query updated"),
            ApplyOutcome::Failed => {
                tracing::warn!(query = %kind, error = ?error, "Query fetch failed; keeping previous data")
            }
            ApplyOutcome::Stale => tracing::debug!(query = %kind, "Discarded stale query result"),
        }

        if let Some(observer) = &self.observer {
            observer.on_update(&QueryUpdate {
                kind,
                generation: guard.generation(),
                outcome,
                error,
            });
        }
        outcome
    }

    /// Refetch every query for `adventurer_id` under a fresh guard.
    pub async fn refetch_all(&self, adventurer_id: AdventurerId) -> RefetchSummary {
        let guard = self.guard();
        self.refetch_guarded(adventurer_id, &guard).await
    }

    /// Refetch every query for `adventurer_id` under `guard`.
    ///
    /// Adventurer, items, the last beast discovery and the latest activity
    /// are fetched concurrently. The beast and its battles depend on the
    /// discovered beast id and are fetched afterwards; without a beast they
    /// are settled as empty.
    pub async fn refetch_guarded(
        &self,
        adventurer_id: AdventurerId,
        guard: &FetchGuard,
    ) -> RefetchSummary {
        let mut summary = RefetchSummary::default();
        if adventurer_id == 0 {
            return summary;
        }

        let (adventurer, items, discovery, latest, last_battle) = tokio::join!(
            self.fetch(QueryRequest::AdventurerById { adventurer_id }, guard),
            self.fetch(QueryRequest::ItemsByAdventurer { adventurer_id }, guard),
            self.fetch(QueryRequest::LastBeastDiscovery { adventurer_id }, guard),
            self.fetch(QueryRequest::LatestDiscovery { adventurer_id }, guard),
            self.fetch(QueryRequest::LastBattle { adventurer_id }, guard),
        );
        summary.outcomes.extend([
            (QueryKind::AdventurerById, adventurer),
            (QueryKind::ItemsByAdventurer, items),
            (QueryKind::LastBeastDiscovery, discovery),
            (QueryKind::LatestDiscovery, latest),
            (QueryKind::LastBattle, last_battle),
        ]);
        if discovery == ApplyOutcome::Stale {
            return summary;
        }

        let beast_id = self
            .store
            .read(|s| s.last_beast_discovery().beast_id())
            .filter(|id| *id != 0);
        summary.beast_id = beast_id;

        let (beast, battles) = match beast_id {
            Some(beast_id) => {
                tokio::join!(
                    self.fetch(QueryRequest::BeastById { beast_id }, guard),
                    self.fetch(
                        QueryRequest::BattlesByBeast {
                            adventurer_id,
                            beast_id
                        },
                        guard
                    ),
                )
            }
            None => (
                self.settle(QueryKind::BeastById, guard, QueryData::empty(QueryKind::BeastById)),
                self.settle(
                    QueryKind::BattlesByBeast,
                    guard,
                    QueryData::empty(QueryKind::BattlesByBeast),
                ),
            ),
        };
        summary.outcomes.extend([
            (QueryKind::BeastById, beast),
            (QueryKind::BattlesByBeast, battles),
        ]);

        tracing::debug!(
            adventurer_id,
            beast_id = ?summary.beast_id,
            complete = summary.is_complete(),
            "Refetched adventurer queries"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use survivor_core::{Adventurer, Beast, Discovery, DiscoveryType, Item};

    use super::*;
    use crate::mock::MockSource;

    fn seeded_source() -> MockSource {
        let source = MockSource::new();
        source.set_adventurer(Adventurer {
            id: 7,
            health: 80,
            level: 3,
            beast_health: 20,
            ..Adventurer::default()
        });
        source.set_items(vec![Item {
            id: 1,
            item: "Katana".into(),
            equipped_adventurer_id: Some(7),
            ..Item::default()
        }]);
        source.push_discovery(Discovery {
            adventurer_id: 7,
            discovery_type: DiscoveryType::Beast,
            entity_id: Some(12),
            timestamp: None,
        });
        source.set_beast(Beast {
            id: 12,
            beast: "Troll".into(),
            health: 20,
            ..Beast::default()
        });
        source
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<QueryUpdate>>);

    impl QueryObserver for Recorder {
        fn on_update(&self, update: &QueryUpdate) {
            self.0.lock().unwrap().push(update.clone());
        }
    }

    #[tokio::test]
    async fn refetch_all_follows_discovered_beast() {
        let source = seeded_source();
        let client = QueryClient::new(Arc::new(source.clone()));

        let summary = client.refetch_all(7).await;
        assert!(summary.is_complete());
        assert_eq!(summary.beast_id, Some(12));

        let store = client.store();
        store.read(|s| {
            assert_eq!(s.adventurer().map(|a| a.id), Some(7));
            assert_eq!(s.items().len(), 1);
            assert_eq!(s.beast().beast, "Troll");
        });
        assert_eq!(source.fetch_count(QueryKind::BeastById), 1);
    }

    #[tokio::test]
    async fn without_discovery_beast_queries_settle_empty() {
        let source = MockSource::new();
        source.set_adventurer(Adventurer {
            id: 7,
            health: 10,
            ..Adventurer::default()
        });
        let client = QueryClient::new(Arc::new(source.clone()));

        let summary = client.refetch_all(7).await;
        assert!(summary.is_complete());
        assert_eq!(summary.beast_id, None);
        assert!(client.store().read(|s| s.beast().is_null()));
        assert_eq!(source.fetch_count(QueryKind::BeastById), 0);
    }

    #[tokio::test]
    async fn null_adventurer_fetches_nothing() {
        let source = seeded_source();
        let client = QueryClient::new(Arc::new(source.clone()));

        let summary = client.refetch_all(0).await;
        assert!(summary.outcomes.is_empty());
        assert_eq!(source.total_fetches(), 0);
    }

    #[tokio::test]
    async fn failure_is_reported_and_data_kept() {
        let source = seeded_source();
        let recorder = Arc::new(Recorder::default());
        let client = QueryClient::new(Arc::new(source.clone())).with_observer(recorder.clone());

        client.refetch_all(7).await;
        source.fail(QueryKind::ItemsByAdventurer);
        let summary = client.refetch_all(7).await;

        assert_eq!(
            summary.failed().collect::<Vec<_>>(),
            vec![QueryKind::ItemsByAdventurer]
        );
        client.store().read(|s| {
            assert_eq!(s.items().len(), 1);
            assert!(s.state(QueryKind::ItemsByAdventurer).has_error());
        });

        let updates = recorder.0.lock().unwrap();
        assert!(updates.iter().any(|u| u.outcome == ApplyOutcome::Failed
            && u.kind == QueryKind::ItemsByAdventurer
            && u.error.is_some()));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_discards_in_flight_results() {
        let source = seeded_source();
        source.set_delay(Duration::from_millis(500));
        let client = QueryClient::new(Arc::new(source));

        let in_flight = {
            let client = client.clone();
            tokio::spawn(async move { client.refetch_all(7).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        client.reset();

        let summary = in_flight.await.unwrap();
        assert!(summary.is_stale());
        client.store().read(|s| {
            assert!(!s.has_data());
            assert!(!s.is_loading());
        });
    }

    #[tokio::test(start_paused = true)]
    async fn dead_guard_abandons_without_applying() {
        let source = seeded_source();
        source.set_delay(Duration::from_millis(200));
        let client = QueryClient::new(Arc::new(source));
        let live = Arc::new(AtomicBool::new(true));
        let guard = FetchGuard::with_liveness(client.generation(), Arc::clone(&live));

        let in_flight = {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .fetch(QueryRequest::ItemsByAdventurer { adventurer_id: 7 }, &guard)
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        live.store(false, Ordering::Release);

        assert_eq!(in_flight.await.unwrap(), ApplyOutcome::Stale);
        client.store().read(|s| {
            assert!(s.items().is_empty());
            assert!(!s.state(QueryKind::ItemsByAdventurer).loading);
        });
    }
}
