//! Per-query `{loading, error, data}` state.
//!
//! The store is the client's copy of the read model. A failed fetch never
//! clears data: it keeps the last-known-good value and raises the error flag.
//! Every result carries the store generation it was fetched under; resetting
//! the store (adventurer switch, disconnect) bumps the generation so results
//! still in flight for the previous adventurer are dropped on arrival.

use std::collections::HashMap;

use survivor_core::{Adventurer, Battle, Beast, Discovery, Item};

use crate::queries::{QueryData, QueryKind};
use crate::source::SourceError;

/// State of one query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    /// A fetch is in flight.
    pub loading: bool,
    /// Message of the most recent failed fetch; cleared by the next success.
    pub error: Option<String>,
    /// Last successfully fetched data.
    pub data: Option<QueryData>,
}

impl QueryState {
    fn new() -> Self {
        Self {
            loading: false,
            error: None,
            data: None,
        }
    }

    /// Loading with nothing to show yet.
    pub fn is_initial_load(&self) -> bool {
        self.loading && self.data.is_none()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of applying a fetch outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Updated,
    /// The fetch failed; previous data kept.
    Failed,
    /// Fetched under an older generation; dropped.
    Stale,
}

/// The client's copy of the read model.
#[derive(Debug, Clone)]
pub struct QueryStore {
    generation: u64,
    queries: HashMap<QueryKind, QueryState>,
}

impl Default for QueryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryStore {
    pub fn new() -> Self {
        Self {
            generation: 0,
            queries: QueryKind::ALL
                .into_iter()
                .map(|kind| (kind, QueryState::new()))
                .collect(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self, kind: QueryKind) -> &QueryState {
        // Every kind is inserted at construction and on reset.
        &self.queries[&kind]
    }

    fn state_mut(&mut self, kind: QueryKind) -> &mut QueryState {
        self.queries.entry(kind).or_insert_with(QueryState::new)
    }

    /// Mark `kind` as in flight. Ignored for stale generations.
    pub fn begin(&mut self, kind: QueryKind, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.state_mut(kind).loading = true;
        true
    }

    /// Apply a fetch outcome for `kind` fetched under `generation`.
    pub fn apply(
        &mut self,
        kind: QueryKind,
        generation: u64,
        result: Result<QueryData, SourceError>,
    ) -> ApplyOutcome {
        if generation != self.generation {
            return ApplyOutcome::Stale;
        }

        let state = self.state_mut(kind);
        state.loading = false;
        match result {
            Ok(data) if data.matches(kind) => {
                state.data = Some(data);
                state.error = None;
                ApplyOutcome::Updated
            }
            Ok(_) => {
                state.error = Some(format!("{kind} returned data of another query"));
                ApplyOutcome::Failed
            }
            Err(error) => {
                state.error = Some(error.to_string());
                ApplyOutcome::Failed
            }
        }
    }

    /// Drop an in-flight fetch without applying its result.
    pub fn abandon(&mut self, kind: QueryKind, generation: u64) {
        if generation == self.generation {
            self.state_mut(kind).loading = false;
        }
    }

    /// Clear every query and invalidate in-flight results.
    pub fn reset(&mut self) {
        self.generation += 1;
        for state in self.queries.values_mut() {
            *state = QueryState::new();
        }
    }

    pub fn is_loading(&self) -> bool {
        self.queries.values().any(|state| state.loading)
    }

    pub fn has_data(&self) -> bool {
        self.queries.values().any(|state| state.data.is_some())
    }

    // ------------------------------------------------------------------
    // Typed accessors
    // ------------------------------------------------------------------

    /// The refetched adventurer, if the indexer returned one.
    pub fn adventurer(&self) -> Option<&Adventurer> {
        match &self.state(QueryKind::AdventurerById).data {
            Some(QueryData::Adventurers(adventurers)) => adventurers.first(),
            _ => None,
        }
    }

    pub fn items(&self) -> &[Item] {
        match &self.state(QueryKind::ItemsByAdventurer).data {
            Some(QueryData::Items(items)) => items,
            _ => &[],
        }
    }

    /// Newest beast discovery, or the null discovery.
    pub fn last_beast_discovery(&self) -> Discovery {
        match &self.state(QueryKind::LastBeastDiscovery).data {
            Some(QueryData::Discoveries(discoveries)) => {
                discoveries.first().cloned().unwrap_or_default()
            }
            _ => Discovery::null(),
        }
    }

    /// Current beast, or the null beast.
    pub fn beast(&self) -> Beast {
        match &self.state(QueryKind::BeastById).data {
            Some(QueryData::Beasts(beasts)) => beasts.first().cloned().unwrap_or_default(),
            _ => Beast::null(),
        }
    }

    pub fn battles(&self) -> &[Battle] {
        match &self.state(QueryKind::BattlesByBeast).data {
            Some(QueryData::Battles(battles)) => battles,
            _ => &[],
        }
    }

    /// Newest discovery of any type, or the null discovery.
    pub fn latest_discovery(&self) -> Discovery {
        match &self.state(QueryKind::LatestDiscovery).data {
            Some(QueryData::Discoveries(discoveries)) => {
                discoveries.first().cloned().unwrap_or_default()
            }
            _ => Discovery::null(),
        }
    }

    /// Newest battle against any beast.
    pub fn last_battle(&self) -> Option<&Battle> {
        match &self.state(QueryKind::LastBattle).data {
            Some(QueryData::Battles(battles)) => battles.first(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(ids: &[u64]) -> QueryData {
        QueryData::Items(
            ids.iter()
                .map(|&id| Item {
                    id,
                    ..Item::default()
                })
                .collect(),
        )
    }

    #[test]
    fn fresh_store_is_empty_and_idle() {
        let store = QueryStore::new();
        assert!(!store.is_loading());
        assert!(!store.has_data());
        assert!(store.items().is_empty());
        assert!(store.beast().is_null());
        assert_eq!(store.last_beast_discovery(), Discovery::null());
        assert!(store.adventurer().is_none());
        assert_eq!(store.latest_discovery(), Discovery::null());
        assert!(store.last_battle().is_none());
    }

    #[test]
    fn activity_accessors_read_their_own_queries() {
        let mut store = QueryStore::new();
        let generation = store.generation();
        let found = Discovery {
            adventurer_id: 1,
            entity_id: Some(4),
            ..Discovery::default()
        };
        store.apply(
            QueryKind::LatestDiscovery,
            generation,
            Ok(QueryData::Discoveries(vec![found.clone()])),
        );
        store.apply(
            QueryKind::LastBattle,
            generation,
            Ok(QueryData::Battles(vec![Battle {
                beast_id: 2,
                ..Battle::default()
            }])),
        );

        assert_eq!(store.latest_discovery(), found);
        assert_eq!(store.last_battle().map(|b| b.beast_id), Some(2));
        assert_eq!(store.last_beast_discovery(), Discovery::null());
        assert!(store.battles().is_empty());
    }

    #[test]
    fn failed_fetch_keeps_previous_data() {
        let mut store = QueryStore::new();
        let generation = store.generation();
        store.begin(QueryKind::ItemsByAdventurer, generation);
        assert!(store.state(QueryKind::ItemsByAdventurer).is_initial_load());

        let outcome = store.apply(QueryKind::ItemsByAdventurer, generation, Ok(items(&[1, 2])));
        assert_eq!(outcome, ApplyOutcome::Updated);

        store.begin(QueryKind::ItemsByAdventurer, generation);
        let outcome = store.apply(
            QueryKind::ItemsByAdventurer,
            generation,
            Err(SourceError::Network("timeout".into())),
        );
        assert_eq!(outcome, ApplyOutcome::Failed);

        let state = store.state(QueryKind::ItemsByAdventurer);
        assert!(!state.loading);
        assert!(state.has_error());
        assert_eq!(store.items().len(), 2);

        store.apply(QueryKind::ItemsByAdventurer, generation, Ok(items(&[3])));
        assert!(!store.state(QueryKind::ItemsByAdventurer).has_error());
        assert_eq!(store.items()[0].id, 3);
    }

    #[test]
    fn reset_drops_in_flight_results() {
        let mut store = QueryStore::new();
        let old = store.generation();
        store.apply(QueryKind::ItemsByAdventurer, old, Ok(items(&[1])));

        store.reset();
        assert!(!store.has_data());
        assert_ne!(store.generation(), old);

        assert!(!store.begin(QueryKind::ItemsByAdventurer, old));
        let outcome = store.apply(QueryKind::ItemsByAdventurer, old, Ok(items(&[9])));
        assert_eq!(outcome, ApplyOutcome::Stale);
        assert!(store.items().is_empty());
    }

    #[test]
    fn mismatched_shape_is_an_error() {
        let mut store = QueryStore::new();
        let generation = store.generation();
        let outcome = store.apply(QueryKind::BeastById, generation, Ok(items(&[1])));
        assert_eq!(outcome, ApplyOutcome::Failed);
        assert!(store.beast().is_null());
    }
}
