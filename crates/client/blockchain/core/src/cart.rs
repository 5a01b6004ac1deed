//! Transaction cart: pending calls submitted as one multicall.

use crate::traits::{AccountTransport, TransportError};
use crate::types::{ContractCall, TransactionHash};

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("Transaction cart is empty")]
    Empty,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// A multicall that left the cart.
#[derive(Debug, Clone)]
pub struct SubmittedBatch {
    pub hash: TransactionHash,
    pub calls: Vec<ContractCall>,
}

/// Ordered queue of calls awaiting batched submission.
#[derive(Debug, Clone, Default)]
pub struct TransactionCart {
    calls: Vec<ContractCall>,
}

impl TransactionCart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_to_calls(&mut self, call: ContractCall) {
        tracing::debug!(entrypoint = %call.entrypoint, "call added to cart");
        self.calls.push(call);
    }

    pub fn calls(&self) -> &[ContractCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Drop every pending call targeting `entrypoint`. Returns how many were removed.
    pub fn remove_entrypoint_from_calls(&mut self, entrypoint: &str) -> usize {
        let before = self.calls.len();
        self.calls.retain(|call| call.entrypoint != entrypoint);
        before - self.calls.len()
    }

    pub fn reset(&mut self) {
        self.calls.clear();
    }

    /// Drain the cart, leaving it empty.
    pub fn take(&mut self) -> Vec<ContractCall> {
        std::mem::take(&mut self.calls)
    }

    /// Submit every pending call as one multicall.
    ///
    /// The cart is cleared whether or not the transport accepts the batch.
    pub async fn submit_calls(
        &mut self,
        transport: &dyn AccountTransport,
    ) -> Result<SubmittedBatch, CartError> {
        let calls = self.take();
        submit_batch(calls, transport).await
    }
}

/// Submit an already-drained batch.
///
/// Callers that keep the cart behind a lock drain it with
/// [`TransactionCart::take`] and submit outside the lock.
pub async fn submit_batch(
    calls: Vec<ContractCall>,
    transport: &dyn AccountTransport,
) -> Result<SubmittedBatch, CartError> {
    if calls.is_empty() {
        return Err(CartError::Empty);
    }

    tracing::info!(calls = calls.len(), "submitting multicall");
    let hash = transport.execute(&calls).await?;
    Ok(SubmittedBatch { hash, calls })
}
