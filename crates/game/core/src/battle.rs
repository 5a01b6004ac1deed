//! Historical combat exchanges.

use chrono::{DateTime, Utc};

use crate::adventurer::AdventurerId;
use crate::beast::BeastId;

/// Which side struck in an exchange.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attacker {
    #[default]
    Adventurer,
    Beast,
}

/// Immutable record of one combat exchange with a beast.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Battle {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub beast_id: BeastId,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub adventurer_id: AdventurerId,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub attacker: Attacker,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub fled: bool,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub damage: u32,
    /// Health of the struck side after the exchange.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub target_health: u32,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub xp_earned: u32,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub gold_earned: u32,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Battle {
    /// True when this exchange killed the beast.
    pub fn slayed_beast(&self) -> bool {
        self.attacker == Attacker::Adventurer && !self.fled && self.target_health == 0
    }

    /// True when this exchange killed the adventurer.
    pub fn killed_adventurer(&self) -> bool {
        self.attacker == Attacker::Beast && self.target_health == 0
    }

    /// One-line battle log entry.
    pub fn describe(&self, beast_name: &str) -> String {
        if self.fled {
            return if self.attacker == Attacker::Adventurer {
                format!("You fled the {beast_name}!")
            } else {
                format!("You failed to flee the {beast_name}.")
            };
        }

        match self.attacker {
            Attacker::Adventurer if self.target_health == 0 => format!(
                "You slayed the {beast_name} with {} damage, earning {} XP and {} gold!",
                self.damage, self.xp_earned, self.gold_earned
            ),
            Attacker::Adventurer => format!(
                "You attacked the {beast_name} for {} damage!",
                self.damage
            ),
            Attacker::Beast if self.target_health == 0 => format!(
                "The {beast_name} struck you for {} damage. You have been slain!",
                self.damage
            ),
            Attacker::Beast => format!(
                "The {beast_name} attacked you for {} damage!",
                self.damage
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battle(attacker: Attacker, damage: u32, target_health: u32) -> Battle {
        Battle {
            beast_id: 1,
            adventurer_id: 1,
            attacker,
            damage,
            target_health,
            ..Battle::default()
        }
    }

    #[test]
    fn describes_each_outcome() {
        assert_eq!(
            battle(Attacker::Adventurer, 5, 10).describe("Balrog"),
            "You attacked the Balrog for 5 damage!"
        );
        assert_eq!(
            battle(Attacker::Beast, 7, 3).describe("Balrog"),
            "The Balrog attacked you for 7 damage!"
        );
        assert!(battle(Attacker::Adventurer, 9, 0).slayed_beast());
        assert!(battle(Attacker::Beast, 9, 0).killed_adventurer());

        let fled = Battle {
            fled: true,
            ..battle(Attacker::Adventurer, 0, 0)
        };
        assert!(!fled.slayed_beast());
        assert_eq!(fled.describe("Ent"), "You fled the Ent!");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn decodes_battle_payload() {
        let json = r#"{
            "beastId": 4,
            "adventurerId": 9,
            "attacker": "Beast",
            "fled": false,
            "damage": 12,
            "targetHealth": 40,
            "xpEarned": null,
            "goldEarned": 0,
            "timestamp": "2023-05-01T12:00:00Z"
        }"#;
        let battle: Battle = serde_json::from_str(json).unwrap();
        assert_eq!(battle.attacker, Attacker::Beast);
        assert_eq!(battle.xp_earned, 0);
        assert!(battle.timestamp.is_some());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn null_attacker_and_fled_decode_as_defaults() {
        let json = r#"{
            "beastId": 4,
            "adventurerId": 9,
            "attacker": null,
            "fled": null,
            "damage": 3,
            "targetHealth": 17
        }"#;
        let battle: Battle = serde_json::from_str(json).unwrap();
        assert_eq!(battle.attacker, Attacker::Adventurer);
        assert!(!battle.fled);
        assert_eq!(battle.describe("Ent"), "You attacked the Ent for 3 damage!");
    }
}
