//! Account transport trait.
//!
//! The transport owns the signer and the network connection. The client only
//! hands it call descriptors and asks about transaction status.

use std::time::Duration;

use async_trait::async_trait;

use crate::types::{ContractAddress, ContractCall, TransactionHash, TransactionStatus};

// ============================================================================
// Error Types
// ============================================================================

/// Transport layer errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("No account connected")]
    NotConnected,

    #[error("Transaction {hash} not final after {waited:?}")]
    Timeout { hash: TransactionHash, waited: Duration },

    #[error("Unknown transaction: {0}")]
    UnknownTransaction(TransactionHash),

    #[error("Backend-specific error: {0}")]
    BackendError(String),
}

/// Polling parameters for [`AccountTransport::wait_for_finality`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalityOptions {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for FinalityOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            timeout: Duration::from_secs(120),
        }
    }
}

// ============================================================================
// Layer 0: Account Transport
// ============================================================================

/// Wallet-backed account able to submit multicalls.
#[async_trait]
pub trait AccountTransport: Send + Sync {
    /// Address of the connected account.
    fn address(&self) -> &ContractAddress;

    /// Sign and submit `calls` as a single multicall transaction.
    async fn execute(&self, calls: &[ContractCall]) -> Result<TransactionHash, TransportError>;

    /// Query transaction status.
    async fn transaction_status(
        &self,
        hash: &TransactionHash,
    ) -> Result<TransactionStatus, TransportError>;

    /// Poll until the transaction is accepted or rejected.
    ///
    /// Returns the final status, or [`TransportError::Timeout`] when the
    /// transaction is still pending after `options.timeout`.
    async fn wait_for_finality(
        &self,
        hash: &TransactionHash,
        options: FinalityOptions,
    ) -> Result<TransactionStatus, TransportError> {
        let started = tokio::time::Instant::now();
        loop {
            let status = self.transaction_status(hash).await?;
            if status.is_final() {
                tracing::debug!(%hash, ?status, "transaction final");
                return Ok(status);
            }

            let waited = started.elapsed();
            if waited >= options.timeout {
                return Err(TransportError::Timeout {
                    hash: hash.clone(),
                    waited,
                });
            }
            tokio::time::sleep(options.poll_interval).await;
        }
    }
}
