//! Beast encounter screen: beast panel, battle controls and battle log.

use client_indexer::QueryStore;
use survivor_core::{ActionGate, Adventurer, BattleIntent};

use crate::state::UiState;

pub const BEAST_PLACEHOLDER: &str = "Beast not yet discovered.";
pub const FLEE_HEADING: &str = "Flee!";
pub const COWARD_LABEL: &str = "you coward!";

/// One battle control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonData {
    pub id: u8,
    pub label: &'static str,
    pub intent: BattleIntent,
    pub disabled: bool,
    /// A batch is pending; draw the spinner.
    pub loading: bool,
    /// Label shown while hovered, if it differs.
    pub hover_label: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BeastPanel {
    Discovered {
        name: String,
        health: u32,
        level: u32,
        tier: u8,
    },
    Placeholder(&'static str),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleLogView {
    pub title: String,
    /// Newest exchange first.
    pub lines: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeastScreenView {
    pub beast: BeastPanel,
    /// Battle controls are only drawn for a living adventurer.
    pub show_controls: bool,
    pub attack_buttons: Vec<ButtonData>,
    pub flee_buttons: Vec<ButtonData>,
    pub flee_heading: &'static str,
    pub battle_log: BattleLogView,
    /// Draw the log beside the controls (large layouts).
    pub show_inline_log: bool,
    /// The log replaces the whole screen (small layouts).
    pub log_screen_open: bool,
}

impl BeastScreenView {
    pub fn build(adventurer: &Adventurer, store: &QueryStore, ui: &UiState, busy: bool) -> Self {
        let beast = store.beast();
        let battles = store.battles();
        let name = beast.display_name();

        let panel = if adventurer.has_beast() && !beast.is_null() {
            BeastPanel::Discovered {
                name: name.clone(),
                health: beast.health,
                level: beast.level,
                tier: beast.tier,
            }
        } else {
            BeastPanel::Placeholder(BEAST_PLACEHOLDER)
        };

        let buttons = |till_death_intent: fn(bool) -> BattleIntent| {
            [false, true]
                .into_iter()
                .zip(1u8..)
                .map(|(till_death, id)| {
                    let intent = till_death_intent(till_death);
                    let gate = ActionGate::evaluate(adventurer, intent, busy);
                    ButtonData {
                        id,
                        label: gate.label(adventurer),
                        intent,
                        disabled: !gate.allowed(),
                        loading: busy,
                        hover_label: till_death.then_some(COWARD_LABEL),
                    }
                })
                .collect::<Vec<_>>()
        };

        Self {
            beast: panel,
            show_controls: adventurer.is_alive(),
            attack_buttons: buttons(|till_death| BattleIntent::Attack { till_death }),
            flee_buttons: buttons(|till_death| BattleIntent::Flee { till_death }),
            flee_heading: if ui.hover_till_death {
                COWARD_LABEL
            } else {
                FLEE_HEADING
            },
            battle_log: BattleLogView {
                title: format!("Battle log with {}", beast.beast),
                lines: battles.iter().map(|battle| battle.describe(&name)).collect(),
            },
            show_inline_log: adventurer.has_beast() || !battles.is_empty(),
            log_screen_open: ui.show_battle_log,
        }
    }
}

#[cfg(test)]
mod tests {
    use client_indexer::{QueryData, QueryKind};
    use survivor_core::{Attacker, Battle, Beast};

    use super::*;

    fn engaged() -> Adventurer {
        Adventurer {
            id: 1,
            health: 40,
            level: 4,
            dexterity: 3,
            beast_health: 12,
            ..Adventurer::default()
        }
    }

    fn store_with_beast() -> QueryStore {
        let mut store = QueryStore::new();
        let generation = store.generation();
        store.apply(
            QueryKind::BeastById,
            generation,
            Ok(QueryData::Beasts(vec![Beast {
                id: 5,
                beast: "Balrog".into(),
                health: 12,
                special2: Some("of Flame".into()),
                ..Beast::default()
            }])),
        );
        store.apply(
            QueryKind::BattlesByBeast,
            generation,
            Ok(QueryData::Battles(vec![Battle {
                attacker: Attacker::Adventurer,
                damage: 4,
                target_health: 12,
                ..Battle::default()
            }])),
        );
        store
    }

    #[test]
    fn null_adventurer_shows_placeholder_and_disabled_controls() {
        let view = BeastScreenView::build(
            &Adventurer::null(),
            &QueryStore::new(),
            &UiState::default(),
            false,
        );
        assert_eq!(view.beast, BeastPanel::Placeholder(BEAST_PLACEHOLDER));
        assert!(!view.show_controls);
        assert!(!view.show_inline_log);
        assert!(view.attack_buttons.iter().all(|b| b.disabled));
        assert!(view.flee_buttons.iter().all(|b| b.disabled));
    }

    #[test]
    fn engaged_adventurer_sees_composed_name_and_log() {
        let view = BeastScreenView::build(&engaged(), &store_with_beast(), &UiState::default(), false);
        assert_eq!(
            view.beast,
            BeastPanel::Discovered {
                name: "Balrog of Flame".into(),
                health: 12,
                level: 0,
                tier: 0,
            }
        );
        assert_eq!(view.battle_log.title, "Battle log with Balrog");
        assert_eq!(
            view.battle_log.lines,
            vec!["You attacked the Balrog of Flame for 4 damage!".to_string()]
        );
        assert!(view.show_inline_log);
        assert!(view.attack_buttons.iter().all(|b| !b.disabled));
        assert_eq!(view.attack_buttons[1].label, "TILL DEATH");
        assert_eq!(view.attack_buttons[1].hover_label, Some(COWARD_LABEL));
        assert_eq!(view.attack_buttons[0].hover_label, None);
    }

    #[test]
    fn flee_disabled_and_relabelled_at_zero_dexterity() {
        let adventurer = Adventurer {
            dexterity: 0,
            ..engaged()
        };
        let view = BeastScreenView::build(&adventurer, &store_with_beast(), &UiState::default(), false);
        assert!(view.flee_buttons.iter().all(|b| b.disabled && b.label == "DEX TOO LOW"));
        assert!(view.attack_buttons.iter().all(|b| !b.disabled));
    }

    #[test]
    fn flee_disabled_at_level_one() {
        let adventurer = Adventurer {
            level: 1,
            ..engaged()
        };
        let view = BeastScreenView::build(&adventurer, &store_with_beast(), &UiState::default(), false);
        assert!(view.flee_buttons.iter().all(|b| b.disabled));
        assert_eq!(view.flee_buttons[0].label, "SINGLE");
    }

    #[test]
    fn pending_batch_disables_everything() {
        let view = BeastScreenView::build(&engaged(), &store_with_beast(), &UiState::default(), true);
        assert!(
            view.attack_buttons
                .iter()
                .chain(&view.flee_buttons)
                .all(|b| b.disabled && b.loading)
        );
    }

    #[test]
    fn hovering_till_death_taunts() {
        let ui = UiState {
            hover_till_death: true,
            show_battle_log: true,
            ..UiState::default()
        };
        let view = BeastScreenView::build(&engaged(), &store_with_beast(), &ui, false);
        assert_eq!(view.flee_heading, COWARD_LABEL);
        assert!(view.log_screen_open);
    }
}
