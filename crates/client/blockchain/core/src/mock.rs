//! Mock account transport for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::traits::{AccountTransport, TransportError};
use crate::types::{ContractAddress, ContractCall, TransactionHash, TransactionStatus};

/// How the mock treats the next submitted batches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOutcome {
    /// Accept after the configured number of pending polls.
    Accept,
    /// Reject after the configured number of pending polls.
    Reject(String),
    /// Fail the `execute` call itself.
    ExecuteError(String),
    /// Stay pending forever.
    NeverFinal,
}

type Effect = Arc<dyn Fn(&[ContractCall]) + Send + Sync>;

struct MockTransaction {
    calls: Vec<ContractCall>,
    pending_polls: u32,
    status: TransactionStatus,
    effect_applied: bool,
}

struct MockState {
    outcome: MockOutcome,
    pending_polls: u32,
    executed: Vec<Vec<ContractCall>>,
    transactions: HashMap<TransactionHash, MockTransaction>,
    effect: Option<Effect>,
    counter: u64,
}

/// Mock account transport without network.
///
/// Records every executed batch. A batch's effect (if set) is applied the
/// first time the batch is observed as accepted, the way an indexer only sees
/// accepted transactions.
#[derive(Clone)]
pub struct MockTransport {
    address: ContractAddress,
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_address(ContractAddress::new("0x0mock"))
    }

    pub fn with_address(address: ContractAddress) -> Self {
        Self {
            address,
            state: Arc::new(Mutex::new(MockState {
                outcome: MockOutcome::Accept,
                pending_polls: 0,
                executed: Vec::new(),
                transactions: HashMap::new(),
                effect: None,
                counter: 0,
            })),
        }
    }

    pub fn set_outcome(&self, outcome: MockOutcome) {
        self.state.lock().unwrap().outcome = outcome;
    }

    /// Number of status polls that report `Pending` before the batch is final.
    pub fn set_pending_polls(&self, polls: u32) {
        self.state.lock().unwrap().pending_polls = polls;
    }

    /// Run `effect` with a batch's calls once that batch is accepted.
    pub fn on_accept(&self, effect: impl Fn(&[ContractCall]) + Send + Sync + 'static) {
        self.state.lock().unwrap().effect = Some(Arc::new(effect));
    }

    pub fn executed(&self) -> Vec<Vec<ContractCall>> {
        self.state.lock().unwrap().executed.clone()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountTransport for MockTransport {
    fn address(&self) -> &ContractAddress {
        &self.address
    }

    async fn execute(&self, calls: &[ContractCall]) -> Result<TransactionHash, TransportError> {
        let mut state = self.state.lock().unwrap();
        let status = match &state.outcome {
            MockOutcome::ExecuteError(message) => {
                return Err(TransportError::TransactionFailed(message.clone()));
            }
            MockOutcome::Accept => TransactionStatus::Accepted {
                block_number: state.counter + 1,
            },
            MockOutcome::Reject(reason) => TransactionStatus::Rejected {
                reason: reason.clone(),
            },
            MockOutcome::NeverFinal => TransactionStatus::Pending,
        };

        state.counter += 1;
        let hash = TransactionHash(format!("0x{:x}", state.counter));
        let transaction = MockTransaction {
            calls: calls.to_vec(),
            pending_polls: state.pending_polls,
            status,
            effect_applied: false,
        };
        state.executed.push(calls.to_vec());
        state.transactions.insert(hash.clone(), transaction);

        Ok(hash)
    }

    async fn transaction_status(
        &self,
        hash: &TransactionHash,
    ) -> Result<TransactionStatus, TransportError> {
        let (status, pending_effect) = {
            let mut state = self.state.lock().unwrap();
            let effect = state.effect.clone();
            let transaction = state
                .transactions
                .get_mut(hash)
                .ok_or_else(|| TransportError::UnknownTransaction(hash.clone()))?;

            if transaction.pending_polls > 0 {
                transaction.pending_polls -= 1;
                return Ok(TransactionStatus::Pending);
            }

            let accepted = matches!(transaction.status, TransactionStatus::Accepted { .. });
            let pending_effect = if accepted && !transaction.effect_applied {
                transaction.effect_applied = true;
                effect.map(|effect| (effect, transaction.calls.clone()))
            } else {
                None
            };
            (transaction.status.clone(), pending_effect)
        };

        // Run outside the lock so the effect may use the transport.
        if let Some((effect, calls)) = pending_effect {
            effect(&calls);
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::traits::FinalityOptions;

    fn call(entrypoint: &str) -> ContractCall {
        ContractCall::new(ContractAddress::new("0x0game"), entrypoint, vec![])
    }

    #[tokio::test]
    async fn test_mock_transport_accepts_after_pending_polls() {
        let transport = MockTransport::new();
        transport.set_pending_polls(2);

        let hash = transport.execute(&[call("attack")]).await.unwrap();
        assert_eq!(
            transport.transaction_status(&hash).await.unwrap(),
            TransactionStatus::Pending
        );
        assert_eq!(
            transport.transaction_status(&hash).await.unwrap(),
            TransactionStatus::Pending
        );
        assert!(matches!(
            transport.transaction_status(&hash).await.unwrap(),
            TransactionStatus::Accepted { .. }
        ));
    }

    #[tokio::test]
    async fn effect_runs_once_on_acceptance() {
        let transport = MockTransport::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        transport.on_accept(move |calls| {
            assert_eq!(calls[0].entrypoint, "flee");
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let hash = transport.execute(&[call("flee")]).await.unwrap();
        transport.transaction_status(&hash).await.unwrap();
        transport.transaction_status(&hash).await.unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejected_batch_has_no_effect() {
        let transport = MockTransport::new();
        transport.set_outcome(MockOutcome::Reject("beast already dead".into()));
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        transport.on_accept(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let hash = transport.execute(&[call("attack")]).await.unwrap();
        let status = transport
            .wait_for_finality(&hash, FinalityOptions::default())
            .await
            .unwrap();
        assert_eq!(
            status,
            TransactionStatus::Rejected {
                reason: "beast already dead".into()
            }
        );
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_finality_times_out() {
        let transport = MockTransport::new();
        transport.set_outcome(MockOutcome::NeverFinal);
        let hash = transport.execute(&[call("attack")]).await.unwrap();

        let options = FinalityOptions {
            poll_interval: std::time::Duration::from_millis(100),
            timeout: std::time::Duration::from_secs(1),
        };
        let result = transport.wait_for_finality(&hash, options).await;
        assert!(matches!(result, Err(TransportError::Timeout { .. })));
    }

    #[tokio::test]
    async fn unknown_hash_is_an_error() {
        let transport = MockTransport::new();
        let result = transport
            .transaction_status(&TransactionHash("0xdead".into()))
            .await;
        assert!(matches!(result, Err(TransportError::UnknownTransaction(_))));
    }
}
