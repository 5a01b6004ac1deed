//! View models: plain data a renderer draws.
//!
//! Every builder accepts the null adventurer and an empty query store, so a
//! view can always be drawn before the first fetch resolves.
pub mod beast_screen;
pub mod header;
pub mod info;

pub use beast_screen::{BattleLogView, BeastPanel, BeastScreenView, ButtonData};
pub use header::{ArcadeButton, CartButton, HeaderInput, HeaderView, PenaltyCountdown};
pub use info::{InfoView, SlotView, StatRow};
