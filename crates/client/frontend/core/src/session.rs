//! Adventurer selection, polling lifecycle and header intents.

use client_indexer::{ApplyOutcome, PollError, PollHandle, QueryKind, QueryPoller};
use survivor_core::{Adventurer, AdventurerId};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use crate::actions::{ActionError, Syscalls};
use crate::context::ClientContext;
use crate::event::{Event, SessionEvent, Topic};
use crate::state::{Screen, UiState};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Adventurer id 0 is the null adventurer")]
    NullAdventurer,

    #[error("Adventurer {0} not found in the read model")]
    NotFound(AdventurerId),

    #[error(transparent)]
    Poll(#[from] PollError),
}

/// Controls emitted by the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderIntent {
    MintLords,
    ToggleArcadeDialog,
    ToggleMute,
    ToggleCart,
    OpenSettings,
    ToggleLedger,
    Disconnect,
}

/// The mounted game view for one adventurer.
///
/// Holding a session keeps the adventurer's queries polled and the active
/// adventurer replaced on every refetched adventurer record; selecting
/// another adventurer or disconnecting unmounts the poller and clears every
/// query before anything new is fetched.
pub struct Session {
    ctx: ClientContext,
    poller: Option<PollHandle>,
    sync: Option<JoinHandle<()>>,
}

impl Session {
    pub fn new(ctx: ClientContext) -> Self {
        Self {
            ctx,
            poller: None,
            sync: None,
        }
    }

    pub fn context(&self) -> &ClientContext {
        &self.ctx
    }

    pub fn active_adventurer(&self) -> Option<AdventurerId> {
        self.poller.as_ref().map(PollHandle::adventurer_id)
    }

    /// Make `adventurer_id` the active adventurer and start polling it.
    ///
    /// Resolves once the first round of queries has been applied.
    pub async fn select_adventurer(&mut self, adventurer_id: AdventurerId) -> Result<Adventurer, SessionError> {
        if adventurer_id == 0 {
            return Err(SessionError::NullAdventurer);
        }

        self.clear();
        let updates = self.ctx.events.subscribe(Topic::Query);
        self.sync = Some(tokio::spawn(follow_adventurer(
            self.ctx.clone(),
            adventurer_id,
            updates,
        )));
        let interval = self.ctx.config().sync.poll_interval;
        let handle = QueryPoller::mount(self.ctx.queries.clone(), adventurer_id, interval);
        self.ctx.ui.update(|ui| ui.disconnected = false);
        self.ctx
            .events
            .publish(Event::Session(SessionEvent::AdventurerSelected(adventurer_id)));

        handle.refetch().await?;
        self.poller = Some(handle);

        match self.sync_adventurer() {
            Some(adventurer) => {
                tracing::info!(adventurer_id, name = %adventurer.name, "Adventurer selected");
                Ok(adventurer)
            }
            None => {
                self.clear();
                Err(SessionError::NotFound(adventurer_id))
            }
        }
    }

    /// Replace the active adventurer from the latest read model, if it has one.
    pub fn sync_adventurer(&self) -> Option<Adventurer> {
        sync_adventurer(&self.ctx, self.active_adventurer()?)
    }

    /// Refetch the active adventurer's queries now.
    pub async fn refetch(&self) -> Result<(), SessionError> {
        if let Some(poller) = &self.poller {
            poller.refetch().await?;
            self.sync_adventurer();
        }
        Ok(())
    }

    /// Drop the account and every piece of adventurer state.
    pub fn disconnect(&mut self) {
        self.clear();
        self.ctx.account.update(|account| account.transport = None);
        self.ctx.ui.update(|ui| {
            ui.disconnected = true;
            ui.display_cart = false;
            ui.display_history = false;
        });
        self.ctx.events.publish(Event::Session(SessionEvent::Disconnected));
        tracing::info!("Disconnected");
    }

    /// Unmount the poller, clear queries and cart, reset the adventurer.
    fn clear(&mut self) {
        if let Some(sync) = self.sync.take() {
            sync.abort();
        }
        if let Some(poller) = self.poller.take() {
            poller.unmount();
        }
        self.ctx.queries.reset();
        self.ctx.cart.update(|cart| cart.reset());
        self.ctx.adventurer.update(|adventurer| *adventurer = Adventurer::null());
        self.ctx.ui.update(UiState::clear_selections);
    }

    /// Apply a header control.
    pub async fn handle_header_intent(
        &mut self,
        intent: HeaderIntent,
        syscalls: &Syscalls,
    ) -> Result<(), ActionError> {
        tracing::debug!(?intent, "Header intent");
        match intent {
            HeaderIntent::MintLords => {
                syscalls.mint_lords().await?;
            }
            HeaderIntent::ToggleArcadeDialog => {
                self.ctx.ui.update(|ui| ui.arcade_dialog = !ui.arcade_dialog);
            }
            HeaderIntent::ToggleMute => self.ctx.ui.update(|ui| ui.muted = !ui.muted),
            HeaderIntent::ToggleCart => {
                self.ctx.ui.update(|ui| ui.display_cart = !ui.display_cart);
            }
            HeaderIntent::OpenSettings => self.ctx.ui.update(|ui| ui.screen = Screen::Settings),
            HeaderIntent::ToggleLedger => {
                self.ctx
                    .ui
                    .update(|ui| ui.display_history = !ui.display_history);
            }
            HeaderIntent::Disconnect => self.disconnect(),
        }
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(sync) = self.sync.take() {
            sync.abort();
        }
    }
}

/// Replace the context's adventurer with the read model's copy of `active`.
fn sync_adventurer(ctx: &ClientContext, active: AdventurerId) -> Option<Adventurer> {
    let adventurer = ctx
        .queries
        .store()
        .read(|store| store.adventurer().filter(|a| a.id == active).cloned())?;

    let changed = ctx.adventurer.update(|current| {
        let changed = *current != adventurer;
        *current = adventurer.clone();
        changed
    });
    if changed {
        ctx.events
            .publish(Event::Session(SessionEvent::AdventurerUpdated(adventurer.id)));
    }
    Some(adventurer)
}

/// Sync the active adventurer after every applied adventurer query.
async fn follow_adventurer(
    ctx: ClientContext,
    active: AdventurerId,
    mut updates: broadcast::Receiver<Event>,
) {
    loop {
        match updates.recv().await {
            Ok(Event::Query(update))
                if update.kind == QueryKind::AdventurerById
                    && update.outcome == ApplyOutcome::Updated =>
            {
                sync_adventurer(&ctx, active);
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(active, skipped, "Adventurer sync lagged; syncing now");
                sync_adventurer(&ctx, active);
            }
            Err(RecvError::Closed) => break,
        }
    }
}
