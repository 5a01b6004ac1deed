//! Adventurer record as served by the read model.

use crate::equipment::EquipmentSlot;
use crate::item::ItemId;

/// On-chain adventurer identifier.
pub type AdventurerId = u64;

/// Player-controlled character with stats and equipment.
///
/// Every field has a defined zero value so views can always render from
/// [`Adventurer::null`] without branching on a missing adventurer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Adventurer {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub id: AdventurerId,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub owner: String,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub name: String,

    // Vitals
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub health: u32,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub gold: u32,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub xp: u32,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub level: u32,

    // Ability scores
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub strength: u16,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub dexterity: u16,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub intelligence: u16,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub vitality: u16,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub wisdom: u16,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub luck: u16,

    /// Health of the beast the adventurer is engaged with; zero when idle.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub beast_health: u32,

    // Equipment references
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::optional_id"))]
    pub weapon_id: Option<ItemId>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::optional_id"))]
    pub head_id: Option<ItemId>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::optional_id"))]
    pub chest_id: Option<ItemId>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::optional_id"))]
    pub hands_id: Option<ItemId>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::optional_id"))]
    pub waist_id: Option<ItemId>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::optional_id"))]
    pub feet_id: Option<ItemId>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::optional_id"))]
    pub neck_id: Option<ItemId>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::optional_id"))]
    pub ring_id: Option<ItemId>,
}

impl Adventurer {
    /// The "no adventurer loaded" sentinel.
    pub fn null() -> Self {
        Self::default()
    }

    /// Resolve an optional adventurer to itself or the null sentinel.
    pub fn or_null(adventurer: Option<&Adventurer>) -> Self {
        adventurer.cloned().unwrap_or_default()
    }

    pub fn is_null(&self) -> bool {
        self.id == 0
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// True while engaged with a beast that still has health.
    pub fn has_beast(&self) -> bool {
        self.beast_health > 0
    }

    /// Item reference stored in the given equipment slot.
    pub fn slot_ref(&self, slot: EquipmentSlot) -> Option<ItemId> {
        match slot {
            EquipmentSlot::Weapon => self.weapon_id,
            EquipmentSlot::Head => self.head_id,
            EquipmentSlot::Chest => self.chest_id,
            EquipmentSlot::Hands => self.hands_id,
            EquipmentSlot::Waist => self.waist_id,
            EquipmentSlot::Feet => self.feet_id,
            EquipmentSlot::Neck => self.neck_id,
            EquipmentSlot::Ring => self.ring_id,
        }
    }

    /// Ability scores in display order.
    pub fn abilities(&self) -> [(&'static str, u16); 6] {
        [
            ("STRENGTH", self.strength),
            ("DEXTERITY", self.dexterity),
            ("INTELLIGENCE", self.intelligence),
            ("VITALITY", self.vitality),
            ("WISDOM", self.wisdom),
            ("LUCK", self.luck),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sentinel_has_zero_fields() {
        let adventurer = Adventurer::null();
        assert!(adventurer.is_null());
        assert!(!adventurer.is_alive());
        assert!(!adventurer.has_beast());
        assert_eq!(adventurer.name, "");
        for slot in EquipmentSlot::ALL {
            assert_eq!(adventurer.slot_ref(slot), None);
        }
        assert!(adventurer.abilities().iter().all(|(_, score)| *score == 0));
    }

    #[test]
    fn or_null_falls_back_to_sentinel() {
        assert_eq!(Adventurer::or_null(None), Adventurer::null());

        let adventurer = Adventurer {
            id: 7,
            health: 10,
            ..Adventurer::default()
        };
        assert_eq!(Adventurer::or_null(Some(&adventurer)).id, 7);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn decodes_indexer_payload_with_nulls() {
        let json = r#"{
            "id": 12,
            "owner": "0x0abc",
            "name": "Loaf",
            "health": 80,
            "gold": 25,
            "xp": 4,
            "level": 2,
            "strength": 3,
            "dexterity": 0,
            "intelligence": 1,
            "vitality": 2,
            "wisdom": 1,
            "luck": 1,
            "beastHealth": null,
            "weaponId": 3,
            "headId": null,
            "chestId": "0",
            "ringId": "9"
        }"#;

        let adventurer: Adventurer = serde_json::from_str(json).unwrap();
        assert_eq!(adventurer.id, 12);
        assert_eq!(adventurer.beast_health, 0);
        assert_eq!(adventurer.weapon_id, Some(3));
        assert_eq!(adventurer.head_id, None);
        assert_eq!(adventurer.chest_id, None);
        assert_eq!(adventurer.ring_id, Some(9));
        assert_eq!(adventurer.feet_id, None);
    }
}
