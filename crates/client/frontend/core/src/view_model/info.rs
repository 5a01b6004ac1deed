//! Adventurer info panel.

use client_indexer::{QueryKind, QueryStore};
use survivor_core::{Adventurer, EquipmentSlot, LevelProgress, resolve_equipment};

/// One equipment slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotView {
    pub slot: EquipmentSlot,
    /// Item display name; `None` renders the empty placeholder.
    pub item: Option<String>,
    pub tier: Option<u8>,
    pub greatness: Option<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatRow {
    pub label: &'static str,
    pub value: u16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfoView {
    pub name: String,
    pub gold: u32,
    pub health: u32,
    pub level: LevelProgress,
    pub slots: Vec<SlotView>,
    pub stats: Vec<StatRow>,
    /// Items are still on their first load; draw a spinner instead.
    pub content_hidden: bool,
}

impl InfoView {
    pub fn build(adventurer: &Adventurer, store: &QueryStore) -> Self {
        let slots = resolve_equipment(store.items(), adventurer)
            .into_iter()
            .map(|resolved| SlotView {
                slot: resolved.slot,
                item: resolved.item.map(|item| item.display_name()),
                tier: resolved.item.map(|item| item.tier),
                greatness: resolved.item.map(|item| item.greatness),
            })
            .collect();

        let stats = adventurer
            .abilities()
            .into_iter()
            .map(|(label, value)| StatRow { label, value })
            .collect();

        Self {
            name: adventurer.name.clone(),
            gold: adventurer.gold,
            health: adventurer.health,
            level: LevelProgress::new(adventurer.xp, adventurer.level),
            slots,
            stats,
            content_hidden: store.state(QueryKind::ItemsByAdventurer).is_initial_load(),
        }
    }
}

#[cfg(test)]
mod tests {
    use client_indexer::QueryData;
    use survivor_core::Item;

    use super::*;

    #[test]
    fn null_adventurer_builds_empty_panel() {
        let view = InfoView::build(&Adventurer::null(), &QueryStore::new());
        assert_eq!(view.slots.len(), 8);
        assert!(view.slots.iter().all(|slot| slot.item.is_none()));
        assert_eq!(view.stats.len(), 6);
        assert!(!view.content_hidden);
    }

    #[test]
    fn equipped_items_fill_their_slots() {
        let mut store = QueryStore::new();
        let generation = store.generation();
        store.apply(
            QueryKind::ItemsByAdventurer,
            generation,
            Ok(QueryData::Items(vec![Item {
                id: 9,
                item: "Katana".into(),
                tier: 1,
                ..Item::default()
            }])),
        );
        let adventurer = Adventurer {
            id: 1,
            weapon_id: Some(9),
            ring_id: Some(77),
            ..Adventurer::default()
        };

        let view = InfoView::build(&adventurer, &store);
        assert_eq!(view.slots[0].slot, EquipmentSlot::Weapon);
        assert_eq!(view.slots[0].item.as_deref(), Some("Katana"));
        assert_eq!(view.slots[0].tier, Some(1));
        assert_eq!(view.slots[7].item, None);
    }

    #[test]
    fn hidden_while_items_first_load() {
        let mut store = QueryStore::new();
        let generation = store.generation();
        store.begin(QueryKind::ItemsByAdventurer, generation);
        assert!(InfoView::build(&Adventurer::null(), &store).content_hidden);
    }
}
