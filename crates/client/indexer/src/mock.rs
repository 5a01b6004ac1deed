//! In-memory read-model source for testing.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use survivor_core::{Adventurer, Battle, Beast, Discovery, DiscoveryType, Item};

use crate::queries::{QueryData, QueryKind, QueryRequest};
use crate::source::{ReadModelSource, SourceError};

#[derive(Default)]
struct MockState {
    adventurers: Vec<Adventurer>,
    items: Vec<Item>,
    discoveries: Vec<Discovery>,
    beasts: Vec<Beast>,
    battles: Vec<Battle>,
    failing: HashSet<QueryKind>,
    fetches: HashMap<QueryKind, usize>,
    delay: Option<Duration>,
}

/// Read-model source answering from in-memory records.
///
/// Filters and ordering mirror the indexer queries: the newest beast
/// discovery first, battles newest first. Later pushes count as newer when
/// timestamps tie.
#[derive(Clone, Default)]
pub struct MockSource {
    state: Arc<Mutex<MockState>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the adventurer with the same id.
    pub fn set_adventurer(&self, adventurer: Adventurer) {
        let mut state = self.state.lock().unwrap();
        state.adventurers.retain(|a| a.id != adventurer.id);
        state.adventurers.push(adventurer);
    }

    /// Apply `f` to a stored adventurer.
    pub fn update_adventurer(&self, id: u64, f: impl FnOnce(&mut Adventurer)) -> bool {
        let mut state = self.state.lock().unwrap();
        match state.adventurers.iter_mut().find(|a| a.id == id) {
            Some(adventurer) => {
                f(adventurer);
                true
            }
            None => false,
        }
    }

    pub fn adventurer(&self, id: u64) -> Option<Adventurer> {
        let state = self.state.lock().unwrap();
        state.adventurers.iter().find(|a| a.id == id).cloned()
    }

    pub fn set_items(&self, items: Vec<Item>) {
        self.state.lock().unwrap().items = items;
    }

    pub fn push_discovery(&self, discovery: Discovery) {
        self.state.lock().unwrap().discoveries.push(discovery);
    }

    /// Insert or replace the beast with the same id.
    pub fn set_beast(&self, beast: Beast) {
        let mut state = self.state.lock().unwrap();
        state.beasts.retain(|b| b.id != beast.id);
        state.beasts.push(beast);
    }

    pub fn beast(&self, id: u64) -> Option<Beast> {
        let state = self.state.lock().unwrap();
        state.beasts.iter().find(|b| b.id == id).cloned()
    }

    pub fn push_battle(&self, battle: Battle) {
        self.state.lock().unwrap().battles.push(battle);
    }

    /// Make every fetch of `kind` fail until [`MockSource::recover`].
    pub fn fail(&self, kind: QueryKind) {
        self.state.lock().unwrap().failing.insert(kind);
    }

    pub fn recover(&self, kind: QueryKind) {
        self.state.lock().unwrap().failing.remove(&kind);
    }

    /// Delay every response by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        self.state.lock().unwrap().delay = Some(delay);
    }

    pub fn fetch_count(&self, kind: QueryKind) -> usize {
        let state = self.state.lock().unwrap();
        state.fetches.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.state.lock().unwrap().fetches.values().sum()
    }

    fn answer(&self, request: &QueryRequest) -> Result<QueryData, SourceError> {
        let state = self.state.lock().unwrap();
        if state.failing.contains(&request.kind()) {
            return Err(SourceError::Network(format!(
                "{} unavailable",
                request.kind()
            )));
        }

        let data = match *request {
            QueryRequest::AdventurerById { adventurer_id } => QueryData::Adventurers(
                state
                    .adventurers
                    .iter()
                    .filter(|a| a.id == adventurer_id)
                    .cloned()
                    .collect(),
            ),
            QueryRequest::ItemsByAdventurer { adventurer_id } => QueryData::Items(
                state
                    .items
                    .iter()
                    .filter(|i| i.equipped_adventurer_id == Some(adventurer_id))
                    .cloned()
                    .collect(),
            ),
            QueryRequest::LastBeastDiscovery { adventurer_id } => {
                // Later pushes count as newer when timestamps tie.
                let newest = state
                    .discoveries
                    .iter()
                    .enumerate()
                    .filter(|(_, d)| {
                        d.adventurer_id == adventurer_id
                            && d.discovery_type == DiscoveryType::Beast
                    })
                    .max_by_key(|(index, d)| (d.timestamp, *index))
                    .map(|(_, d)| d.clone());
                QueryData::Discoveries(newest.into_iter().collect())
            }
            QueryRequest::BeastById { beast_id } => QueryData::Beasts(
                state
                    .beasts
                    .iter()
                    .filter(|b| b.id == beast_id)
                    .cloned()
                    .collect(),
            ),
            QueryRequest::BattlesByBeast {
                adventurer_id,
                beast_id,
            } => {
                let mut battles: Vec<(usize, Battle)> = state
                    .battles
                    .iter()
                    .filter(|b| b.adventurer_id == adventurer_id && b.beast_id == beast_id)
                    .cloned()
                    .enumerate()
                    .collect();
                battles.sort_by_key(|(index, b)| std::cmp::Reverse((b.timestamp, *index)));
                QueryData::Battles(battles.into_iter().map(|(_, b)| b).collect())
            }
            QueryRequest::LatestDiscovery { adventurer_id } => {
                let newest = state
                    .discoveries
                    .iter()
                    .enumerate()
                    .filter(|(_, d)| d.adventurer_id == adventurer_id)
                    .max_by_key(|(index, d)| (d.timestamp, *index))
                    .map(|(_, d)| d.clone());
                QueryData::Discoveries(newest.into_iter().collect())
            }
            QueryRequest::LastBattle { adventurer_id } => {
                let newest = state
                    .battles
                    .iter()
                    .enumerate()
                    .filter(|(_, b)| b.adventurer_id == adventurer_id)
                    .max_by_key(|(index, b)| (b.timestamp, *index))
                    .map(|(_, b)| b.clone());
                QueryData::Battles(newest.into_iter().collect())
            }
        };
        Ok(data)
    }
}

#[async_trait]
impl ReadModelSource for MockSource {
    async fn fetch(&self, request: &QueryRequest) -> Result<QueryData, SourceError> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            *state.fetches.entry(request.kind()).or_insert(0) += 1;
            state.delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.answer(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn newest_beast_discovery_wins() {
        let source = MockSource::new();
        for (entity, kind) in [
            (3, DiscoveryType::Beast),
            (4, DiscoveryType::Beast),
            (5, DiscoveryType::Item),
        ] {
            source.push_discovery(Discovery {
                adventurer_id: 1,
                discovery_type: kind,
                entity_id: Some(entity),
                timestamp: None,
            });
        }

        let data = source
            .fetch(&QueryRequest::LastBeastDiscovery { adventurer_id: 1 })
            .await
            .unwrap();
        match data {
            QueryData::Discoveries(found) => assert_eq!(found[0].beast_id(), Some(4)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn latest_activity_ignores_type_and_beast() {
        let source = MockSource::new();
        source.push_discovery(Discovery {
            adventurer_id: 1,
            discovery_type: DiscoveryType::Beast,
            entity_id: Some(3),
            timestamp: None,
        });
        source.push_discovery(Discovery {
            adventurer_id: 1,
            discovery_type: DiscoveryType::Obstacle,
            entity_id: Some(9),
            timestamp: None,
        });
        source.push_battle(Battle {
            adventurer_id: 1,
            beast_id: 3,
            ..Battle::default()
        });
        source.push_battle(Battle {
            adventurer_id: 1,
            beast_id: 4,
            damage: 6,
            ..Battle::default()
        });

        let latest = source
            .fetch(&QueryRequest::LatestDiscovery { adventurer_id: 1 })
            .await
            .unwrap();
        match latest {
            QueryData::Discoveries(found) => {
                assert_eq!(found.len(), 1);
                assert_eq!(found[0].discovery_type, DiscoveryType::Obstacle);
            }
            other => panic!("unexpected {other:?}"),
        }

        let last = source
            .fetch(&QueryRequest::LastBattle { adventurer_id: 1 })
            .await
            .unwrap();
        match last {
            QueryData::Battles(battles) => {
                assert_eq!(battles.len(), 1);
                assert_eq!(battles[0].beast_id, 4);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn failing_kind_errors_until_recovered() {
        let source = MockSource::new();
        source.fail(QueryKind::BeastById);
        let request = QueryRequest::BeastById { beast_id: 1 };

        assert!(source.fetch(&request).await.is_err());
        source.recover(QueryKind::BeastById);
        assert!(source.fetch(&request).await.is_ok());
        assert_eq!(source.fetch_count(QueryKind::BeastById), 2);
    }
}
