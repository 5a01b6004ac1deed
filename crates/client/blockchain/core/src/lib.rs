//! Contract-call abstraction layer for the Loot Survivor client.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: TransactionCart (pending calls, batched submission)
//!
//! Layer 1: Contract builders (GameContract, LordsContract)
//!          └── produce ContractCall descriptors
//!
//! Layer 0: AccountTransport (multicall + status, signer lives behind it)
//! ```
//!
//! # Design Philosophy
//!
//! - **Layer 0 (Transport)**: Pure account operations, no game knowledge
//! - **Layer 1 (Contracts)**: Game entrypoints and their calldata layout
//! - **Layer 2 (Cart)**: Accumulates calls and submits them as one multicall
//!
//! # Usage
//!
//! ```ignore
//! use client_blockchain_core::{GameContract, TransactionCart};
//!
//! let mut cart = TransactionCart::new();
//! cart.add_to_calls(game.attack(adventurer_id, false));
//! let batch = cart.submit_calls(&transport).await?;
//! transport.wait_for_finality(&batch.hash, FinalityOptions::default()).await?;
//! ```

pub mod cart;
pub mod config;
pub mod contracts;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use cart::{CartError, SubmittedBatch, TransactionCart, submit_batch};
pub use config::{BlockchainConfig, ChainConfig, Network};
pub use contracts::{GameContract, LordsContract};
pub use traits::{AccountTransport, FinalityOptions, TransportError};
pub use types::{ContractAddress, ContractCall, TransactionHash, TransactionStatus};

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockOutcome, MockTransport};
