//! Action controller: battle intents, LORDS minting and cart submission.
//!
//! Every submission runs the same lifecycle:
//!
//! ```text
//! Idle -> Pending -> (multicall) -> wait for finality -> Confirmed | Failed
//!                                          |
//!                                  refetch read model, replace adventurer
//! ```
//!
//! The read model is refetched strictly after the transport reports the batch
//! accepted, so the replaced adventurer always reflects the batch.

use std::sync::Arc;

use client_blockchain_core::contracts::DEFAULT_MINT_AMOUNT;
use client_blockchain_core::{
    AccountTransport, CartError, ContractCall, TransactionCart, TransactionHash,
    TransactionStatus, TransportError, submit_batch,
};
use client_indexer::QueryStore;
use survivor_core::{ActionGate, Adventurer, BattleIntent, GateReason};

use crate::context::ClientContext;
use crate::event::{Event, SessionEvent, TransactionEvent};
use crate::message::MessageLevel;
use crate::state::{LedgerStatus, LoadingState, UiState};

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Action not allowed: {0}")]
    Gated(#[from] GateReason),

    #[error("No adventurer selected")]
    NoAdventurer,

    #[error("No account connected")]
    NotConnected,

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("Transaction {hash} rejected: {reason}")]
    Rejected {
        hash: TransactionHash,
        reason: String,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ActionError {
    /// Hash of the submitted batch, when the failure happened after submission.
    pub fn hash(&self) -> Option<&TransactionHash> {
        match self {
            ActionError::Rejected { hash, .. } => Some(hash),
            ActionError::Transport(TransportError::Timeout { hash, .. }) => Some(hash),
            _ => None,
        }
    }
}

/// What a batch was submitted for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchKind {
    Battle(BattleIntent),
    MintLords,
    Cart,
}

/// Result of a confirmed batch.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub hash: TransactionHash,
    pub calls: Vec<ContractCall>,
    /// Active adventurer after the post-confirmation refetch.
    pub adventurer: Adventurer,
    pub died: bool,
}

/// Issues player actions against the connected account.
#[derive(Clone)]
pub struct Syscalls {
    ctx: ClientContext,
}

impl Syscalls {
    pub fn new(ctx: ClientContext) -> Self {
        Self { ctx }
    }

    pub async fn attack(&self, till_death: bool) -> Result<BatchReport, ActionError> {
        self.battle(BattleIntent::Attack { till_death }).await
    }

    pub async fn flee(&self, till_death: bool) -> Result<BatchReport, ActionError> {
        self.battle(BattleIntent::Flee { till_death }).await
    }

    pub async fn dispatch(&self, intent: BattleIntent) -> Result<BatchReport, ActionError> {
        self.battle(intent).await
    }

    /// Mint LORDS to the connected account, bypassing the cart.
    pub async fn mint_lords(&self) -> Result<BatchReport, ActionError> {
        let transport = self.transport()?;
        let call = self.ctx.lords.mint(transport.address(), DEFAULT_MINT_AMOUNT);
        let report = self.run(transport, BatchKind::MintLords, vec![call]).await?;
        self.ctx.account.update(|account| {
            account.lords_balance = account.lords_balance.saturating_add(DEFAULT_MINT_AMOUNT);
        });
        Ok(report)
    }

    /// Submit whatever the cart holds.
    pub async fn submit_cart(&self) -> Result<BatchReport, ActionError> {
        let transport = self.transport()?;
        if self.ctx.cart.read(TransactionCart::is_empty) {
            return Err(CartError::Empty.into());
        }
        self.submit(transport, BatchKind::Cart, None).await
    }

    pub fn add_to_cart(&self, call: ContractCall) {
        self.ctx.cart.update(|cart| cart.add_to_calls(call));
    }

    /// Drop every queued call to `entrypoint`.
    pub fn remove_entrypoint(&self, entrypoint: &str) -> usize {
        self.ctx
            .cart
            .update(|cart| cart.remove_entrypoint_from_calls(entrypoint))
    }

    fn transport(&self) -> Result<Arc<dyn AccountTransport>, ActionError> {
        self.ctx
            .account
            .read(|account| account.transport.clone())
            .ok_or(ActionError::NotConnected)
    }

    async fn battle(&self, intent: BattleIntent) -> Result<BatchReport, ActionError> {
        let adventurer = self.ctx.adventurer.snapshot();
        if adventurer.is_null() {
            return Err(ActionError::NoAdventurer);
        }
        let busy = self.ctx.loading.read(LoadingState::is_loading);
        if let Err(reason) = ActionGate::check(&adventurer, intent, busy) {
            tracing::debug!(?intent, %reason, "Battle intent refused");
            return Err(reason.into());
        }
        let transport = self.transport()?;

        let call = match intent {
            BattleIntent::Attack { till_death } => self.ctx.game.attack(adventurer.id, till_death),
            BattleIntent::Flee { till_death } => self.ctx.game.flee(adventurer.id, till_death),
        };
        self.submit(transport, BatchKind::Battle(intent), Some(call))
            .await
    }

    /// Enter `Pending`, queue `call` if given, then drain the cart.
    async fn submit(
        &self,
        transport: Arc<dyn AccountTransport>,
        kind: BatchKind,
        call: Option<ContractCall>,
    ) -> Result<BatchReport, ActionError> {
        let label = self.label(kind);
        if !self.ctx.loading.update(|loading| loading.start(label.clone())) {
            return Err(GateReason::Busy.into());
        }
        let calls = self.ctx.cart.update(|cart| {
            if let Some(call) = call {
                cart.add_to_calls(call);
            }
            cart.take()
        });
        self.lifecycle(transport, kind, label, calls).await
    }

    async fn run(
        &self,
        transport: Arc<dyn AccountTransport>,
        kind: BatchKind,
        calls: Vec<ContractCall>,
    ) -> Result<BatchReport, ActionError> {
        let label = self.label(kind);
        if !self.ctx.loading.update(|loading| loading.start(label.clone())) {
            return Err(GateReason::Busy.into());
        }
        self.lifecycle(transport, kind, label, calls).await
    }

    async fn lifecycle(
        &self,
        transport: Arc<dyn AccountTransport>,
        kind: BatchKind,
        label: String,
        calls: Vec<ContractCall>,
    ) -> Result<BatchReport, ActionError> {
        let result = self.execute(transport.as_ref(), kind, &label, calls).await;
        if let Err(error) = &result {
            tracing::warn!(%label, %error, "Batch failed");
            let hash = error.hash().cloned();
            if let ActionError::Rejected { hash, .. } = error {
                self.ctx
                    .loading
                    .update(|loading| loading.settle_history(hash, LedgerStatus::Rejected));
            }
            self.ctx
                .loading
                .update(|loading| loading.fail(format!("{label} failed: {error}")));
            self.ctx
                .events
                .publish(Event::Transaction(TransactionEvent::Failed {
                    hash,
                    reason: error.to_string(),
                }));
        }
        result
    }

    async fn execute(
        &self,
        transport: &dyn AccountTransport,
        kind: BatchKind,
        label: &str,
        calls: Vec<ContractCall>,
    ) -> Result<BatchReport, ActionError> {
        let batch = submit_batch(calls, transport).await?;
        let hash = batch.hash.clone();
        let entrypoints = batch.calls.iter().map(|c| c.entrypoint.clone()).collect();
        self.ctx
            .loading
            .update(|loading| loading.record_submission(hash.clone(), label, entrypoints));
        self.ctx
            .events
            .publish(Event::Transaction(TransactionEvent::Submitted {
                hash: hash.clone(),
                label: label.to_string(),
                calls: batch.calls.len(),
            }));

        let finality = self.ctx.config().transactions.finality();
        match transport.wait_for_finality(&hash, finality).await? {
            TransactionStatus::Accepted { block_number } => {
                tracing::info!(%hash, block_number, "Batch accepted");
            }
            TransactionStatus::Rejected { reason } => {
                return Err(ActionError::Rejected { hash, reason });
            }
            TransactionStatus::Pending => {
                return Err(TransportError::Timeout {
                    hash,
                    waited: finality.timeout,
                }
                .into());
            }
        }

        self.ctx
            .loading
            .update(|loading| loading.settle_history(&hash, LedgerStatus::Accepted));
        self.ctx
            .events
            .publish(Event::Transaction(TransactionEvent::Confirmed { hash: hash.clone() }));

        let adventurer = self.refresh().await;
        self.ctx.ui.update(UiState::clear_selections);

        let died = !adventurer.is_null() && !adventurer.is_alive();
        if died {
            let message = self
                .ctx
                .queries
                .store()
                .read(|store| death_message(&adventurer, store));
            tracing::info!(adventurer_id = adventurer.id, %message, "Adventurer died");
            self.ctx.loading.update(|loading| {
                loading.confirm(hash.clone());
                loading.death_message = Some(message);
            });
            self.ctx.ui.update(|ui| ui.death_dialog = true);
            self.ctx
                .events
                .publish(Event::Transaction(TransactionEvent::AdventurerDied {
                    adventurer_id: adventurer.id,
                }));
        } else {
            let notification = self
                .ctx
                .queries
                .store()
                .read(|store| success_message(kind, label, store));
            self.ctx.loading.update(|loading| {
                loading.confirm(hash.clone());
                loading.notify(notification, MessageLevel::Success);
            });
        }

        Ok(BatchReport {
            hash,
            calls: batch.calls,
            adventurer,
            died,
        })
    }

    /// Refetch the read model and replace the active adventurer from it.
    async fn refresh(&self) -> Adventurer {
        let adventurer_id = self.ctx.adventurer.read(|adventurer| adventurer.id);
        if adventurer_id == 0 {
            return Adventurer::null();
        }

        let summary = self.ctx.queries.refetch_all(adventurer_id).await;
        let refreshed = self
            .ctx
            .queries
            .store()
            .read(|store| store.adventurer().cloned());

        match refreshed {
            // A reset while refetching means another adventurer is active now.
            Some(adventurer) if !summary.is_stale() => {
                self.ctx.adventurer.update(|current| *current = adventurer.clone());
                self.ctx
                    .events
                    .publish(Event::Session(SessionEvent::AdventurerUpdated(adventurer.id)));
                adventurer
            }
            _ => {
                tracing::warn!(adventurer_id, "Refetch after confirmation returned no adventurer");
                self.ctx.adventurer.snapshot()
            }
        }
    }

    fn label(&self, kind: BatchKind) -> String {
        match kind {
            BatchKind::Battle(intent) => {
                let beast = self
                    .ctx
                    .queries
                    .store()
                    .read(|store| store.beast().display_name());
                let verb = match intent {
                    BattleIntent::Attack { .. } => "Attacking",
                    BattleIntent::Flee { .. } => "Fleeing",
                };
                if beast.is_empty() {
                    verb.to_string()
                } else {
                    format!("{verb} {beast}")
                }
            }
            BatchKind::MintLords => "Minting Lords".to_string(),
            BatchKind::Cart => "Submitting transactions".to_string(),
        }
    }
}

fn death_message(adventurer: &Adventurer, store: &QueryStore) -> String {
    let beast_name = store.beast().display_name();
    match store.battles().first() {
        Some(battle) if battle.killed_adventurer() => battle.describe(&beast_name),
        _ if adventurer.name.is_empty() => "Your adventurer has died.".to_string(),
        _ => format!("{} has died.", adventurer.name),
    }
}

fn success_message(kind: BatchKind, label: &str, store: &QueryStore) -> String {
    match kind {
        BatchKind::Battle(_) => {
            let beast_name = store.beast().display_name();
            store
                .battles()
                .first()
                .map(|battle| battle.describe(&beast_name))
                .unwrap_or_else(|| format!("{label} confirmed"))
        }
        BatchKind::MintLords => "Minted 25 LORDS".to_string(),
        BatchKind::Cart => "Transactions confirmed".to_string(),
    }
}
