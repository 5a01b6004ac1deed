//! Client state and presentation shared by every Loot Survivor frontend.
//!
//! Houses the context-passed state containers, the action controller, the
//! session flow, the event bus and the view models that terminal and future
//! graphical clients render.
pub mod actions;
pub mod config;
pub mod context;
pub mod event;
pub mod format;
pub mod message;
pub mod session;
pub mod state;
pub mod view_model;

pub use actions::{ActionError, BatchKind, BatchReport, Syscalls};
pub use config::{FrontendConfig, HeaderConfig, MessageConfig, SyncConfig, TransactionConfig};
pub use context::ClientContext;
pub use event::{Event, EventBus, SessionEvent, Topic, TransactionEvent};
pub use message::{MessageEntry, MessageLevel, MessageLog};
pub use session::{HeaderIntent, Session, SessionError};
pub use state::{AccountState, BatchState, LedgerEntry, LedgerStatus, LoadingState, Screen, UiState};
pub use view_model::{BeastScreenView, HeaderView, InfoView};
