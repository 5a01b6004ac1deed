//! Read-model records and pure rules shared across clients.
//!
//! `survivor-core` defines the typed records the indexer returns (adventurers,
//! items, beasts, discoveries, battles), their null sentinels, and the
//! deterministic transforms views are built from: equipment-slot resolution,
//! beast name composition, level progression and action gating.
//!
//! Nothing in this crate performs I/O. Records are only ever replaced by fresh
//! read-model data; they are never mutated in place by the client.
pub mod adventurer;
pub mod battle;
pub mod beast;
pub mod discovery;
pub mod equipment;
pub mod item;
pub mod progression;
pub mod rules;

#[cfg(feature = "serde")]
mod de;

pub use adventurer::{Adventurer, AdventurerId};
pub use battle::{Attacker, Battle};
pub use beast::{Beast, BeastId, compose_beast_name};
pub use discovery::{Discovery, DiscoveryType};
pub use equipment::{EquipmentSlot, ResolvedSlot, resolve_equipment};
pub use item::{Item, ItemId};
pub use progression::LevelProgress;
pub use rules::{ActionGate, BattleIntent, GateReason, MIN_FLEE_LEVEL};
