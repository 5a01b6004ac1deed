//! Equipment-slot resolution.
//!
//! An adventurer stores one item reference per body slot; the items themselves
//! arrive from a separate query. Resolution pairs each slot with its item by
//! identifier match, in a fixed display order.

use std::fmt;

use crate::adventurer::Adventurer;
use crate::item::Item;

/// The eight body slots, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EquipmentSlot {
    Weapon,
    Head,
    Chest,
    Hands,
    Waist,
    Feet,
    Neck,
    Ring,
}

impl EquipmentSlot {
    pub const ALL: [EquipmentSlot; 8] = [
        EquipmentSlot::Weapon,
        EquipmentSlot::Head,
        EquipmentSlot::Chest,
        EquipmentSlot::Hands,
        EquipmentSlot::Waist,
        EquipmentSlot::Feet,
        EquipmentSlot::Neck,
        EquipmentSlot::Ring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentSlot::Weapon => "weapon",
            EquipmentSlot::Head => "head",
            EquipmentSlot::Chest => "chest",
            EquipmentSlot::Hands => "hands",
            EquipmentSlot::Waist => "waist",
            EquipmentSlot::Feet => "feet",
            EquipmentSlot::Neck => "neck",
            EquipmentSlot::Ring => "ring",
        }
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A slot paired with the item it references, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedSlot<'a> {
    pub slot: EquipmentSlot,
    /// `None` renders as the empty placeholder.
    pub item: Option<&'a Item>,
}

impl ResolvedSlot<'_> {
    pub fn is_empty(&self) -> bool {
        self.item.is_none()
    }
}

/// Resolve all eight slots of `adventurer` against `items`.
///
/// Each slot resolves to the first item whose id equals the slot reference.
/// Empty references and references with no matching item resolve to `None`.
pub fn resolve_equipment<'a>(items: &'a [Item], adventurer: &Adventurer) -> [ResolvedSlot<'a>; 8] {
    EquipmentSlot::ALL.map(|slot| ResolvedSlot {
        slot,
        item: adventurer
            .slot_ref(slot)
            .and_then(|id| items.iter().find(|item| item.id == id)),
    })
}
