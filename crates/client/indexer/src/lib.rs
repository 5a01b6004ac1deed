//! Read-model synchronization for the Loot Survivor client.
//!
//! The indexer serves a denormalized view of on-chain state. This crate keeps
//! a local copy of the queries a game screen needs and keeps it fresh:
//!
//! - [`queries`] names the queries, their variables and GraphQL documents
//! - [`source`] is the seam to the indexer ([`ReadModelSource`])
//! - [`graphql`] implements the source over HTTP
//! - [`store`] holds per-query `{loading, error, data}` state
//! - [`client`] fetches and applies results with stale-result protection
//! - [`poller`] re-fetches on a timer while a view is mounted
//! - [`shared`] provides the reader/writer state containers used client-wide
pub mod client;
pub mod graphql;
pub mod poller;
pub mod queries;
pub mod shared;
pub mod source;
pub mod store;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use client::{FetchGuard, QueryClient, QueryObserver, QueryUpdate, RefetchSummary};
pub use graphql::{GraphqlIndexer, IndexerConfig};
pub use poller::{DEFAULT_POLL_INTERVAL, PollError, PollHandle, QueryPoller};
pub use queries::{QueryData, QueryKind, QueryRequest};
pub use shared::{SharedStore, StoreReader};
pub use source::{ReadModelSource, SourceError};
pub use store::{ApplyOutcome, QueryState, QueryStore};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockSource;
