//! Client-side state containers.
//!
//! Each container lives in a [`client_indexer::SharedStore`] held by
//! [`crate::ClientContext`]. Writers are the action controller and the
//! session; views only read.

use std::fmt;
use std::sync::Arc;

use client_blockchain_core::{AccountTransport, ContractAddress, TransactionHash};
use survivor_core::ItemId;

use crate::message::{MessageLevel, MessageLog};

// ============================================================================
// UI flags
// ============================================================================

/// Top-level screen selection.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Screen {
    #[default]
    Play,
    Beast,
    Inventory,
    Settings,
}

#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub screen: Screen,
    pub disconnected: bool,
    pub muted: bool,
    pub display_cart: bool,
    pub display_history: bool,
    pub arcade_dialog: bool,
    pub death_dialog: bool,
    /// Items selected for equipping on the next submission.
    pub equip_items: Vec<ItemId>,
    /// Items selected for dropping on the next submission.
    pub drop_items: Vec<ItemId>,
    /// Battle log opened as its own screen (small layouts).
    pub show_battle_log: bool,
    /// Pointer is over an until-death battle button.
    pub hover_till_death: bool,
    /// Pointer is over the LORDS balance button.
    pub hover_mint: bool,
}

impl UiState {
    pub fn clear_selections(&mut self) {
        self.equip_items.clear();
        self.drop_items.clear();
    }
}

// ============================================================================
// Batch lifecycle
// ============================================================================

/// Lifecycle of the most recent batch.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum BatchState {
    #[default]
    Idle,
    Pending {
        label: String,
    },
    Confirmed {
        hash: TransactionHash,
    },
    Failed {
        reason: String,
    },
}

impl BatchState {
    pub fn is_pending(&self) -> bool {
        matches!(self, BatchState::Pending { .. })
    }
}

/// Final status of a ledger entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LedgerStatus {
    Pending,
    Accepted,
    Rejected,
}

impl fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LedgerStatus::Pending => "pending",
            LedgerStatus::Accepted => "accepted",
            LedgerStatus::Rejected => "rejected",
        })
    }
}

/// One submitted batch in the transaction history.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerEntry {
    pub hash: TransactionHash,
    pub label: String,
    pub entrypoints: Vec<String>,
    pub status: LedgerStatus,
}

/// Submission progress, notifications and history.
#[derive(Clone, Debug)]
pub struct LoadingState {
    pub batch: BatchState,
    pub hash: Option<TransactionHash>,
    pub death_message: Option<String>,
    pub notifications: MessageLog,
    pub history: Vec<LedgerEntry>,
}

impl LoadingState {
    pub fn new(capacity: usize) -> Self {
        Self {
            batch: BatchState::Idle,
            hash: None,
            death_message: None,
            notifications: MessageLog::new(capacity),
            history: Vec::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.batch.is_pending()
    }

    /// Enter `Pending` unless a batch already is.
    pub fn start(&mut self, label: impl Into<String>) -> bool {
        if self.batch.is_pending() {
            return false;
        }
        self.batch = BatchState::Pending {
            label: label.into(),
        };
        self.hash = None;
        true
    }

    pub fn record_submission(&mut self, hash: TransactionHash, label: &str, entrypoints: Vec<String>) {
        self.hash = Some(hash.clone());
        self.history.push(LedgerEntry {
            hash,
            label: label.to_string(),
            entrypoints,
            status: LedgerStatus::Pending,
        });
    }

    pub fn settle_history(&mut self, hash: &TransactionHash, status: LedgerStatus) {
        if let Some(entry) = self.history.iter_mut().rev().find(|e| &e.hash == hash) {
            entry.status = status;
        }
    }

    pub fn confirm(&mut self, hash: TransactionHash) {
        self.batch = BatchState::Confirmed { hash };
    }

    pub fn notify(&mut self, text: impl Into<String>, level: MessageLevel) {
        self.notifications.push_text(text, level);
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        self.notifications.push_text(reason.clone(), MessageLevel::Error);
        self.batch = BatchState::Failed { reason };
    }

    pub fn reset_notification(&mut self) {
        self.notifications.clear();
        self.death_message = None;
    }
}

impl Default for LoadingState {
    fn default() -> Self {
        Self::new(64)
    }
}

// ============================================================================
// Account
// ============================================================================

/// Connected account and wallet-side facts shown in the header.
#[derive(Clone, Default)]
pub struct AccountState {
    pub transport: Option<Arc<dyn AccountTransport>>,
    /// LORDS balance in base units (10^-18 LORDS).
    pub lords_balance: u128,
    /// Names of the arcade (session-key) connectors available to this wallet.
    pub arcade_connectors: Vec<String>,
    pub wrong_network: bool,
}

impl AccountState {
    pub fn address(&self) -> Option<&ContractAddress> {
        self.transport.as_deref().map(|transport| transport.address())
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// The connected account is one of the arcade connectors.
    pub fn is_arcade(&self) -> bool {
        self.address().is_some_and(|address| {
            self.arcade_connectors
                .iter()
                .any(|name| name == address.as_str())
        })
    }
}

impl fmt::Debug for AccountState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountState")
            .field("address", &self.address())
            .field("lords_balance", &self.lords_balance)
            .field("wrong_network", &self.wrong_network)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_refuses_while_pending() {
        let mut loading = LoadingState::default();
        assert!(loading.start("Attacking"));
        assert!(loading.is_loading());
        assert!(!loading.start("Fleeing"));

        loading.fail("rejected");
        assert!(!loading.is_loading());
        assert!(loading.start("Fleeing"));
    }

    #[test]
    fn history_entries_settle_by_hash() {
        let mut loading = LoadingState::default();
        let hash = TransactionHash("0x1".into());
        loading.record_submission(hash.clone(), "Attacking", vec!["attack".into()]);
        loading.settle_history(&hash, LedgerStatus::Accepted);
        assert_eq!(loading.history[0].status, LedgerStatus::Accepted);
        assert_eq!(loading.hash, Some(hash));
    }

    #[test]
    fn clearing_selections_keeps_flags() {
        let mut ui = UiState {
            muted: true,
            equip_items: vec![1],
            drop_items: vec![2],
            ..UiState::default()
        };
        ui.clear_selections();
        assert!(ui.muted);
        assert!(ui.equip_items.is_empty() && ui.drop_items.is_empty());
    }
}
