//! Named read-model queries and their GraphQL documents.

use std::fmt;

use serde_json::{Value, json};
use survivor_core::{Adventurer, AdventurerId, Battle, Beast, BeastId, Discovery, Item};

/// The queries a game screen keeps in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    AdventurerById,
    ItemsByAdventurer,
    LastBeastDiscovery,
    BeastById,
    BattlesByBeast,
    LatestDiscovery,
    LastBattle,
}

impl QueryKind {
    pub const ALL: [QueryKind; 7] = [
        QueryKind::AdventurerById,
        QueryKind::ItemsByAdventurer,
        QueryKind::LastBeastDiscovery,
        QueryKind::BeastById,
        QueryKind::BattlesByBeast,
        QueryKind::LatestDiscovery,
        QueryKind::LastBattle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::AdventurerById => "adventurerById",
            QueryKind::ItemsByAdventurer => "itemsByAdventurer",
            QueryKind::LastBeastDiscovery => "lastBeastDiscovery",
            QueryKind::BeastById => "beastById",
            QueryKind::BattlesByBeast => "battlesByBeast",
            QueryKind::LatestDiscovery => "latestDiscovery",
            QueryKind::LastBattle => "lastBattle",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query plus its variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRequest {
    AdventurerById { adventurer_id: AdventurerId },
    ItemsByAdventurer { adventurer_id: AdventurerId },
    LastBeastDiscovery { adventurer_id: AdventurerId },
    BeastById { beast_id: BeastId },
    BattlesByBeast { adventurer_id: AdventurerId, beast_id: BeastId },
    /// Newest discovery of any type.
    LatestDiscovery { adventurer_id: AdventurerId },
    /// Newest battle against any beast.
    LastBattle { adventurer_id: AdventurerId },
}

impl QueryRequest {
    pub fn kind(&self) -> QueryKind {
        match self {
            QueryRequest::AdventurerById { .. } => QueryKind::AdventurerById,
            QueryRequest::ItemsByAdventurer { .. } => QueryKind::ItemsByAdventurer,
            QueryRequest::LastBeastDiscovery { .. } => QueryKind::LastBeastDiscovery,
            QueryRequest::BeastById { .. } => QueryKind::BeastById,
            QueryRequest::BattlesByBeast { .. } => QueryKind::BattlesByBeast,
            QueryRequest::LatestDiscovery { .. } => QueryKind::LatestDiscovery,
            QueryRequest::LastBattle { .. } => QueryKind::LastBattle,
        }
    }

    /// GraphQL document for this query.
    pub fn document(&self) -> &'static str {
        match self.kind() {
            QueryKind::AdventurerById => GET_ADVENTURER_BY_ID,
            QueryKind::ItemsByAdventurer => GET_ITEMS_BY_ADVENTURER,
            QueryKind::LastBeastDiscovery => GET_LAST_BEAST_DISCOVERY,
            QueryKind::BeastById => GET_BEAST_BY_ID,
            QueryKind::BattlesByBeast => GET_BATTLES_BY_BEAST,
            QueryKind::LatestDiscovery => GET_LATEST_DISCOVERY,
            QueryKind::LastBattle => GET_LAST_BATTLE,
        }
    }

    /// Field of the response `data` object holding the result list.
    pub fn root_field(&self) -> &'static str {
        match self.kind() {
            QueryKind::AdventurerById => "adventurers",
            QueryKind::ItemsByAdventurer => "items",
            QueryKind::LastBeastDiscovery | QueryKind::LatestDiscovery => "discoveries",
            QueryKind::BeastById => "beasts",
            QueryKind::BattlesByBeast | QueryKind::LastBattle => "battles",
        }
    }

    pub fn variables(&self) -> Value {
        match *self {
            QueryRequest::AdventurerById { adventurer_id } => json!({ "id": adventurer_id }),
            QueryRequest::ItemsByAdventurer { adventurer_id }
            | QueryRequest::LastBeastDiscovery { adventurer_id }
            | QueryRequest::LatestDiscovery { adventurer_id }
            | QueryRequest::LastBattle { adventurer_id } => {
                json!({ "adventurer": adventurer_id })
            }
            QueryRequest::BeastById { beast_id } => json!({ "id": beast_id }),
            QueryRequest::BattlesByBeast {
                adventurer_id,
                beast_id,
            } => json!({ "adventurer": adventurer_id, "beast": beast_id }),
        }
    }
}

/// Typed result of a query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
    Adventurers(Vec<Adventurer>),
    Items(Vec<Item>),
    Discoveries(Vec<Discovery>),
    Beasts(Vec<Beast>),
    Battles(Vec<Battle>),
}

impl QueryData {
    /// Empty result of the shape `kind` produces.
    pub fn empty(kind: QueryKind) -> Self {
        match kind {
            QueryKind::AdventurerById => QueryData::Adventurers(Vec::new()),
            QueryKind::ItemsByAdventurer => QueryData::Items(Vec::new()),
            QueryKind::LastBeastDiscovery | QueryKind::LatestDiscovery => {
                QueryData::Discoveries(Vec::new())
            }
            QueryKind::BeastById => QueryData::Beasts(Vec::new()),
            QueryKind::BattlesByBeast | QueryKind::LastBattle => QueryData::Battles(Vec::new()),
        }
    }

    /// Whether this data has the shape `kind` produces.
    pub fn matches(&self, kind: QueryKind) -> bool {
        matches!(
            (self, kind),
            (QueryData::Adventurers(_), QueryKind::AdventurerById)
                | (QueryData::Items(_), QueryKind::ItemsByAdventurer)
                | (
                    QueryData::Discoveries(_),
                    QueryKind::LastBeastDiscovery | QueryKind::LatestDiscovery
                )
                | (QueryData::Beasts(_), QueryKind::BeastById)
                | (
                    QueryData::Battles(_),
                    QueryKind::BattlesByBeast | QueryKind::LastBattle
                )
        )
    }

    pub fn len(&self) -> usize {
        match self {
            QueryData::Adventurers(v) => v.len(),
            QueryData::Items(v) => v.len(),
            QueryData::Discoveries(v) => v.len(),
            QueryData::Beasts(v) => v.len(),
            QueryData::Battles(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub const GET_ADVENTURER_BY_ID: &str = concat!(
    "query get_adventurer_by_id($id: FeltValue) { ",
    "adventurers(where: { id: { eq: $id } }) { ",
    "id owner name health gold xp level strength dexterity intelligence vitality wisdom luck ",
    "beastHealth weaponId headId chestId handsId waistId feetId neckId ringId } }"
);

pub const GET_ITEMS_BY_ADVENTURER: &str = concat!(
    "query get_items_by_adventurer($adventurer: FeltValue) { ",
    "items(where: { equippedAdventurerId: { eq: $adventurer } }, limit: 100000) { ",
    "id item slot type tier greatness xp special1 special2 special3 equippedAdventurerId } }"
);

pub const GET_LAST_BEAST_DISCOVERY: &str = concat!(
    "query get_last_beast_discovery($adventurer: FeltValue) { ",
    "discoveries(where: { adventurerId: { eq: $adventurer }, discoveryType: { eq: \"Beast\" } }, ",
    "limit: 1, orderBy: { timestamp: { desc: true } }) { ",
    "adventurerId discoveryType entityId timestamp } }"
);

pub const GET_BEAST_BY_ID: &str = concat!(
    "query get_beast_by_id($id: FeltValue) { ",
    "beasts(where: { id: { eq: $id } }) { ",
    "id beast health level tier special1 special2 special3 } }"
);

pub const GET_BATTLES_BY_BEAST: &str = concat!(
    "query get_battles_by_beast($adventurer: FeltValue, $beast: FeltValue) { ",
    "battles(where: { adventurerId: { eq: $adventurer }, beastId: { eq: $beast } }, ",
    "orderBy: { timestamp: { desc: true } }) { ",
    "beastId adventurerId attacker fled damage targetHealth xpEarned goldEarned timestamp } }"
);

pub const GET_LATEST_DISCOVERY: &str = concat!(
    "query get_latest_discovery($adventurer: FeltValue) { ",
    "discoveries(where: { adventurerId: { eq: $adventurer } }, ",
    "limit: 1, orderBy: { timestamp: { desc: true } }) { ",
    "adventurerId discoveryType entityId timestamp } }"
);

pub const GET_LAST_BATTLE: &str = concat!(
    "query get_last_battle($adventurer: FeltValue) { ",
    "battles(where: { adventurerId: { eq: $adventurer } }, ",
    "limit: 1, orderBy: { timestamp: { desc: true } }) { ",
    "beastId adventurerId attacker fled damage targetHealth xpEarned goldEarned timestamp } }"
);

#[cfg(test)]
mod tests {
    use super::*;

    const ADVENTURER_FIELDS: &str = "id owner name health gold xp level strength dexterity \
        intelligence vitality wisdom luck beastHealth weaponId headId chestId handsId waistId \
        feetId neckId ringId";

    #[test]
    fn documents_request_every_adventurer_field() {
        for field in ADVENTURER_FIELDS.split_whitespace() {
            assert!(
                GET_ADVENTURER_BY_ID.contains(field),
                "missing adventurer field {field}"
            );
        }
    }

    #[test]
    fn variables_follow_request() {
        let request = QueryRequest::BattlesByBeast {
            adventurer_id: 3,
            beast_id: 11,
        };
        assert_eq!(request.kind(), QueryKind::BattlesByBeast);
        assert_eq!(request.root_field(), "battles");
        assert_eq!(request.variables(), json!({ "adventurer": 3, "beast": 11 }));
    }

    #[test]
    fn empty_data_matches_its_kind() {
        for kind in QueryKind::ALL {
            let data = QueryData::empty(kind);
            assert!(data.matches(kind));
            assert!(data.is_empty());
        }
        assert!(!QueryData::Items(vec![]).matches(QueryKind::BeastById));
    }

    #[test]
    fn activity_queries_span_every_type() {
        let latest = QueryRequest::LatestDiscovery { adventurer_id: 5 };
        assert_eq!(latest.root_field(), "discoveries");
        assert!(!latest.document().contains("discoveryType: { eq"));
        assert!(latest.document().contains("limit: 1"));

        let last = QueryRequest::LastBattle { adventurer_id: 5 };
        assert_eq!(last.root_field(), "battles");
        assert!(!last.document().contains("beastId: { eq"));
        assert_eq!(last.variables(), json!({ "adventurer": 5 }));
    }
}
