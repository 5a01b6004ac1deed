//! Header bar.

use std::time::Duration;

use chrono::{DateTime, Utc};
use client_indexer::QueryStore;
use survivor_core::Adventurer;

use crate::format::{display_address, format_lords};
use crate::state::{AccountState, UiState};

pub const MINT_LABEL: &str = "Mint Lords";
pub const CONNECT_LABEL: &str = "Connect";

/// Seconds until the idle penalty applies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PenaltyCountdown {
    pub seconds_left: u64,
    /// The read model is refreshing; the countdown may jump.
    pub refreshing: bool,
}

impl PenaltyCountdown {
    pub fn expired(&self) -> bool {
        self.seconds_left == 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArcadeButton {
    pub disabled: bool,
    /// Pulse to invite creating an arcade account.
    pub pulse: bool,
    /// The connected account is an arcade account.
    pub is_arcade: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartButton {
    /// The cart holds calls.
    pub highlighted: bool,
    pub calls: usize,
    pub open: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderView {
    pub penalty: Option<PenaltyCountdown>,
    pub lords_label: String,
    pub arcade: ArcadeButton,
    pub muted: bool,
    /// Only shown with a connected account.
    pub cart: Option<CartButton>,
    /// Only shown with a connected account.
    pub ledger_label: Option<&'static str>,
    pub account_label: String,
}

/// Everything the header reads.
pub struct HeaderInput<'a> {
    pub adventurer: &'a Adventurer,
    pub store: &'a QueryStore,
    pub ui: &'a UiState,
    pub account: &'a AccountState,
    pub cart_len: usize,
    pub idle_penalty: Duration,
    pub now: DateTime<Utc>,
}

impl HeaderView {
    pub fn build(input: HeaderInput<'_>) -> Self {
        let HeaderInput {
            adventurer,
            store,
            ui,
            account,
            cart_len,
            idle_penalty,
            now,
        } = input;

        let connected = account.is_connected();
        let is_arcade = account.is_arcade();

        let penalty = (!adventurer.is_null())
            .then(|| penalty_countdown(store, idle_penalty, now))
            .flatten();

        let lords_label = if ui.hover_mint {
            MINT_LABEL.to_string()
        } else {
            format_lords(account.lords_balance)
        };

        Self {
            penalty,
            lords_label,
            arcade: ArcadeButton {
                disabled: account.wrong_network || !connected,
                pulse: !is_arcade,
                is_arcade,
            },
            muted: ui.muted,
            cart: connected.then_some(CartButton {
                highlighted: cart_len > 0,
                calls: cart_len,
                open: ui.display_cart,
            }),
            ledger_label: connected.then_some(if ui.display_history {
                "Hide Ledger"
            } else {
                "Show Ledger"
            }),
            account_label: account
                .address()
                .map(|address| display_address(address.as_str()))
                .unwrap_or_else(|| CONNECT_LABEL.to_string()),
        }
    }
}

/// Countdown from the most recent discovery or battle of any kind.
fn penalty_countdown(
    store: &QueryStore,
    idle_penalty: Duration,
    now: DateTime<Utc>,
) -> Option<PenaltyCountdown> {
    let last_discovery = store.latest_discovery().timestamp;
    let last_battle = store.last_battle().and_then(|battle| battle.timestamp);
    let last_activity = last_discovery.max(last_battle)?;

    let idle_penalty = chrono::Duration::from_std(idle_penalty).ok()?;
    let remaining = (last_activity + idle_penalty - now).num_seconds().max(0);

    Some(PenaltyCountdown {
        seconds_left: remaining as u64,
        refreshing: store.is_loading(),
    })
}
