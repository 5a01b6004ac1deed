//! In-process simulated chain.
//!
//! Accepted battle calls are resolved against a [`MockSource`] the same way
//! the indexer would reflect them: the adventurer, beast and battle records
//! change only once the batch is accepted.

use chrono::Utc;
use client_blockchain_core::{ContractCall, MockTransport};
use client_indexer::MockSource;
use survivor_core::{Adventurer, AdventurerId, Attacker, Battle, Beast, BeastId, Discovery, DiscoveryType};

pub const DEVNET_ADVENTURER: AdventurerId = 1;
const DEVNET_BEAST: BeastId = 7;

/// Seed the read model with one adventurer engaged with one beast.
pub fn seed(source: &MockSource, name: &str) {
    source.set_adventurer(Adventurer {
        id: DEVNET_ADVENTURER,
        owner: "0x0devnet".into(),
        name: name.to_string(),
        health: 100,
        xp: 4,
        level: 2,
        strength: 3,
        dexterity: 2,
        vitality: 2,
        beast_health: 30,
        ..Adventurer::default()
    });
    source.push_discovery(Discovery {
        adventurer_id: DEVNET_ADVENTURER,
        discovery_type: DiscoveryType::Beast,
        entity_id: Some(DEVNET_BEAST),
        timestamp: Some(Utc::now()),
    });
    source.set_beast(Beast {
        id: DEVNET_BEAST,
        beast: "Troll".into(),
        health: 30,
        level: 3,
        tier: 4,
        special2: Some("Grim".into()),
        special3: Some("Shout".into()),
        ..Beast::default()
    });
}

/// Resolve accepted batches against `source`.
pub fn install(transport: &MockTransport, source: &MockSource) {
    let chain = Simulation {
        source: source.clone(),
    };
    transport.on_accept(move |calls| chain.apply(calls));
}

struct Simulation {
    source: MockSource,
}

/// Outcome of one exchange.
enum Round {
    Continue,
    Over,
}

impl Simulation {
    fn apply(&self, calls: &[ContractCall]) {
        for call in calls {
            let Some(adventurer_id) = call.calldata.first().and_then(|id| id.parse().ok()) else {
                continue;
            };
            let till_death = call.calldata.get(2).is_some_and(|flag| flag == "1");

            match call.entrypoint.as_str() {
                "attack" => self.repeat(adventurer_id, till_death, Self::attack),
                "flee" => self.repeat(adventurer_id, till_death, Self::flee),
                // Minting has no read-model effect.
                _ => {}
            }
        }
    }

    fn repeat(&self, adventurer_id: AdventurerId, till_death: bool, round: fn(&Self, AdventurerId) -> Round) {
        while let Round::Continue = round(self, adventurer_id) {
            if !till_death {
                break;
            }
        }
    }

    fn attack(&self, adventurer_id: AdventurerId) -> Round {
        let Some((adventurer, mut beast)) = self.engagement(adventurer_id) else {
            return Round::Over;
        };

        let damage = 4 + u32::from(adventurer.strength) * 2;
        beast.health = beast.health.saturating_sub(damage);
        let slain = beast.health == 0;
        let (xp, gold) = if slain {
            (beast.level * 4, beast.level * 2)
        } else {
            (0, 0)
        };

        self.source.push_battle(Battle {
            beast_id: beast.id,
            adventurer_id,
            attacker: Attacker::Adventurer,
            fled: false,
            damage,
            target_health: beast.health,
            xp_earned: xp,
            gold_earned: gold,
            timestamp: Some(Utc::now()),
        });
        let beast_health = beast.health;
        self.source.set_beast(beast.clone());
        self.source.update_adventurer(adventurer_id, |adventurer| {
            adventurer.beast_health = beast_health;
            adventurer.xp += xp;
            adventurer.gold += gold;
            adventurer.level = level_for(adventurer.xp);
        });

        if slain {
            tracing::info!(adventurer_id, beast = %beast.display_name(), "Devnet: beast slain");
            return Round::Over;
        }
        self.counter(adventurer_id, &beast)
    }

    fn flee(&self, adventurer_id: AdventurerId) -> Round {
        let Some((adventurer, beast)) = self.engagement(adventurer_id) else {
            return Round::Over;
        };

        if u32::from(adventurer.dexterity) >= beast.level {
            self.source.push_battle(Battle {
                beast_id: beast.id,
                adventurer_id,
                attacker: Attacker::Adventurer,
                fled: true,
                timestamp: Some(Utc::now()),
                ..Battle::default()
            });
            self.source
                .update_adventurer(adventurer_id, |adventurer| adventurer.beast_health = 0);
            return Round::Over;
        }
        self.counter(adventurer_id, &beast)
    }

    /// The beast strikes back.
    fn counter(&self, adventurer_id: AdventurerId, beast: &Beast) -> Round {
        let Some(adventurer) = self.source.adventurer(adventurer_id) else {
            return Round::Over;
        };
        let damage = (beast.level * 3)
            .saturating_sub(u32::from(adventurer.vitality))
            .max(1);
        let health = adventurer.health.saturating_sub(damage);

        self.source.push_battle(Battle {
            beast_id: beast.id,
            adventurer_id,
            attacker: Attacker::Beast,
            fled: false,
            damage,
            target_health: health,
            timestamp: Some(Utc::now()),
            ..Battle::default()
        });
        self.source
            .update_adventurer(adventurer_id, |adventurer| adventurer.health = health);

        if health == 0 { Round::Over } else { Round::Continue }
    }

    /// A living adventurer and the living beast it is engaged with.
    fn engagement(&self, adventurer_id: AdventurerId) -> Option<(Adventurer, Beast)> {
        let adventurer = self.source.adventurer(adventurer_id)?;
        if !adventurer.is_alive() || !adventurer.has_beast() {
            return None;
        }
        let beast = self.source.beast(DEVNET_BEAST)?;
        (!beast.is_defeated()).then_some((adventurer, beast))
    }
}

/// Level `n` starts at `n²` xp.
fn level_for(xp: u32) -> u32 {
    xp.isqrt().max(1)
}
