//! Exploration discoveries.

use chrono::{DateTime, Utc};

use crate::adventurer::AdventurerId;
use crate::beast::BeastId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiscoveryType {
    #[default]
    Nothing,
    Beast,
    Obstacle,
    Item,
}

/// What an adventurer found while exploring.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Discovery {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub adventurer_id: AdventurerId,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub discovery_type: DiscoveryType,
    /// Id of the discovered entity; a beast id for beast discoveries.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::optional_id"))]
    pub entity_id: Option<u64>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Discovery {
    pub fn null() -> Self {
        Self::default()
    }

    /// Beast id when this discovery revealed a beast.
    pub fn beast_id(&self) -> Option<BeastId> {
        match self.discovery_type {
            DiscoveryType::Beast => self.entity_id,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_beast_discoveries_yield_beast_id() {
        let beast = Discovery {
            discovery_type: DiscoveryType::Beast,
            entity_id: Some(8),
            ..Discovery::default()
        };
        assert_eq!(beast.beast_id(), Some(8));

        let item = Discovery {
            discovery_type: DiscoveryType::Item,
            entity_id: Some(8),
            ..Discovery::default()
        };
        assert_eq!(item.beast_id(), None);
        assert_eq!(Discovery::null().beast_id(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn null_columns_decode_as_defaults() {
        let json = r#"{
            "adventurerId": 3,
            "discoveryType": null,
            "entityId": null,
            "timestamp": null
        }"#;
        let discovery: Discovery = serde_json::from_str(json).unwrap();
        assert_eq!(discovery.discovery_type, DiscoveryType::Nothing);
        assert_eq!(discovery.beast_id(), None);
        assert_eq!(discovery.adventurer_id, 3);
    }
}
