//! The client context: every state container a frontend needs, passed
//! explicitly instead of living in globals.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use client_blockchain_core::{AccountTransport, GameContract, LordsContract, TransactionCart};
use client_indexer::{QueryClient, QueryStore, ReadModelSource, SharedStore, StoreReader};
use survivor_core::Adventurer;

use crate::config::FrontendConfig;
use crate::event::EventBus;
use crate::state::{AccountState, LoadingState, UiState};
use crate::view_model::{BeastScreenView, HeaderView, InfoView};

/// Shared client state.
///
/// Cloning is cheap; clones share every container. Writers are crate-private:
/// the action controller ([`crate::Syscalls`]) and the session
/// ([`crate::Session`]) mutate, everyone else reads through
/// [`StoreReader`]s or builds view models.
#[derive(Clone)]
pub struct ClientContext {
    config: Arc<FrontendConfig>,
    pub(crate) adventurer: SharedStore<Adventurer>,
    pub(crate) ui: SharedStore<UiState>,
    pub(crate) loading: SharedStore<LoadingState>,
    pub(crate) cart: SharedStore<TransactionCart>,
    pub(crate) account: SharedStore<AccountState>,
    pub(crate) queries: QueryClient,
    pub(crate) events: EventBus,
    pub(crate) game: GameContract,
    pub(crate) lords: LordsContract,
}

impl ClientContext {
    pub fn new(
        config: FrontendConfig,
        source: Arc<dyn ReadModelSource>,
        game: GameContract,
        lords: LordsContract,
    ) -> Self {
        let events = EventBus::new();
        let queries = QueryClient::new(source).with_observer(Arc::new(events.clone()));
        let ui = UiState {
            muted: config.header.start_muted,
            ..UiState::default()
        };
        let loading = LoadingState::new(config.messages.capacity);

        Self {
            config: Arc::new(config),
            adventurer: SharedStore::new(Adventurer::null()),
            ui: SharedStore::new(ui),
            loading: SharedStore::new(loading),
            cart: SharedStore::new(TransactionCart::new()),
            account: SharedStore::new(AccountState::default()),
            queries,
            events,
            game,
            lords,
        }
    }

    pub fn config(&self) -> &FrontendConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ------------------------------------------------------------------
    // Readers
    // ------------------------------------------------------------------

    pub fn adventurer(&self) -> StoreReader<Adventurer> {
        self.adventurer.reader()
    }

    pub fn ui(&self) -> StoreReader<UiState> {
        self.ui.reader()
    }

    pub fn loading(&self) -> StoreReader<LoadingState> {
        self.loading.reader()
    }

    pub fn cart(&self) -> StoreReader<TransactionCart> {
        self.cart.reader()
    }

    pub fn account(&self) -> StoreReader<AccountState> {
        self.account.reader()
    }

    pub fn queries(&self) -> StoreReader<QueryStore> {
        self.queries.store()
    }

    // ------------------------------------------------------------------
    // Wallet
    // ------------------------------------------------------------------

    /// Attach the connected account.
    pub fn connect(&self, transport: Arc<dyn AccountTransport>) {
        let address = transport.address().clone();
        self.account.update(|account| account.transport = Some(transport));
        self.ui.update(|ui| ui.disconnected = false);
        tracing::info!(%address, "Account connected");
    }

    pub fn set_lords_balance(&self, balance: u128) {
        self.account.update(|account| account.lords_balance = balance);
    }

    pub fn set_arcade_connectors(&self, connectors: Vec<String>) {
        self.account.update(|account| account.arcade_connectors = connectors);
    }

    pub fn set_wrong_network(&self, wrong_network: bool) {
        self.account.update(|account| account.wrong_network = wrong_network);
    }

    // ------------------------------------------------------------------
    // Pointer state
    // ------------------------------------------------------------------

    pub fn set_hover_till_death(&self, hovered: bool) {
        self.ui.update(|ui| ui.hover_till_death = hovered);
    }

    pub fn set_hover_mint(&self, hovered: bool) {
        self.ui.update(|ui| ui.hover_mint = hovered);
    }

    /// Open or close the stand-alone battle log (small layouts).
    pub fn set_show_battle_log(&self, show: bool) {
        self.ui.update(|ui| ui.show_battle_log = show);
    }

    pub fn dismiss_death_dialog(&self) {
        self.ui.update(|ui| ui.death_dialog = false);
        self.loading.update(LoadingState::reset_notification);
    }

    // ------------------------------------------------------------------
    // View models
    // ------------------------------------------------------------------

    pub fn info_view(&self) -> InfoView {
        let adventurer = self.adventurer.snapshot();
        self.queries
            .store()
            .read(|store| InfoView::build(&adventurer, store))
    }

    pub fn beast_screen_view(&self) -> BeastScreenView {
        let adventurer = self.adventurer.snapshot();
        let ui = self.ui.snapshot();
        let busy = self.loading.read(LoadingState::is_loading);
        self.queries
            .store()
            .read(|store| BeastScreenView::build(&adventurer, store, &ui, busy))
    }

    pub fn header_view(&self, now: DateTime<Utc>) -> HeaderView {
        let adventurer = self.adventurer.snapshot();
        let ui = self.ui.snapshot();
        let cart_len = self.cart.read(TransactionCart::len);
        let idle_penalty = self.config.header.idle_penalty;
        self.account.read(|account| {
            self.queries.store().read(|store| {
                HeaderView::build(crate::view_model::HeaderInput {
                    adventurer: &adventurer,
                    store,
                    ui: &ui,
                    account,
                    cart_len,
                    idle_penalty,
                    now,
                })
            })
        })
    }
}
