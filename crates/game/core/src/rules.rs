//! Action gating.
//!
//! Whether a battle intent may be issued is decided here, once, so views can
//! disable and relabel controls and the action layer can refuse the same
//! intents with the same reasons.

use thiserror::Error;

use crate::adventurer::Adventurer;

/// Adventurers at or below this level cannot flee.
pub const MIN_FLEE_LEVEL: u32 = 1;

/// A combat intent against the current beast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BattleIntent {
    Attack { till_death: bool },
    Flee { till_death: bool },
}

impl BattleIntent {
    pub fn till_death(&self) -> bool {
        match self {
            BattleIntent::Attack { till_death } | BattleIntent::Flee { till_death } => *till_death,
        }
    }

    pub fn entrypoint(&self) -> &'static str {
        match self {
            BattleIntent::Attack { .. } => "attack",
            BattleIntent::Flee { .. } => "flee",
        }
    }
}

/// Why an intent is not currently allowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GateReason {
    #[error("adventurer is dead")]
    AdventurerDead,

    #[error("no beast to fight")]
    NoBeast,

    #[error("a transaction is already pending")]
    Busy,

    #[error("dexterity too low to flee")]
    DexterityTooLow,

    #[error("adventurer level too low to flee")]
    LevelTooLow,
}

/// Gate evaluation for one intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionGate {
    pub intent: BattleIntent,
    /// First failing precondition, if any.
    pub blocked_by: Option<GateReason>,
}

impl ActionGate {
    /// Evaluate `intent` for `adventurer` while `busy` says whether a batch is pending.
    pub fn evaluate(adventurer: &Adventurer, intent: BattleIntent, busy: bool) -> Self {
        Self {
            intent,
            blocked_by: Self::check(adventurer, intent, busy).err(),
        }
    }

    /// Precondition check as a `Result`.
    pub fn check(adventurer: &Adventurer, intent: BattleIntent, busy: bool) -> Result<(), GateReason> {
        if !adventurer.is_alive() {
            return Err(GateReason::AdventurerDead);
        }
        if !adventurer.has_beast() {
            return Err(GateReason::NoBeast);
        }
        if busy {
            return Err(GateReason::Busy);
        }
        if let BattleIntent::Flee { .. } = intent {
            if adventurer.dexterity == 0 {
                return Err(GateReason::DexterityTooLow);
            }
            if adventurer.level <= MIN_FLEE_LEVEL {
                return Err(GateReason::LevelTooLow);
            }
        }
        Ok(())
    }

    pub fn allowed(&self) -> bool {
        self.blocked_by.is_none()
    }

    /// Button label: the variant name, or "DEX TOO LOW" for flee at zero dexterity.
    pub fn label(&self, adventurer: &Adventurer) -> &'static str {
        if matches!(self.intent, BattleIntent::Flee { .. }) && adventurer.dexterity == 0 {
            return "DEX TOO LOW";
        }
        if self.intent.till_death() {
            "TILL DEATH"
        } else {
            "SINGLE"
        }
    }
}
