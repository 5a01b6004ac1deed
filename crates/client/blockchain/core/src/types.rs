//! Common types for contract interactions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hex-encoded contract or account address (a field element).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractAddress(pub String);

impl ContractAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One contract invocation awaiting submission.
///
/// Calldata is a list of decimal field-element strings, in the order the
/// entrypoint expects them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCall {
    pub contract_address: ContractAddress,
    pub entrypoint: String,
    pub calldata: Vec<String>,
}

impl ContractCall {
    pub fn new(
        contract_address: ContractAddress,
        entrypoint: impl Into<String>,
        calldata: Vec<String>,
    ) -> Self {
        Self {
            contract_address,
            entrypoint: entrypoint.into(),
            calldata,
        }
    }
}

/// Transaction hash returned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionHash(pub String);

impl TransactionHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transaction status on the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Submitted, not yet final
    Pending,

    /// Accepted on-chain
    Accepted { block_number: u64 },

    /// Rejected or reverted on-chain
    Rejected { reason: String },
}

impl TransactionStatus {
    pub fn is_final(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}
