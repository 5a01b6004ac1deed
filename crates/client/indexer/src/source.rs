//! The seam between the client and the read-model service.

use async_trait::async_trait;

use crate::queries::{QueryData, QueryRequest};

/// Read-model fetch errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Indexer returned errors: {0}")]
    Graphql(String),

    #[error("Malformed {field} payload: {message}")]
    Decode { field: &'static str, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Anything that can answer read-model queries.
#[async_trait]
pub trait ReadModelSource: Send + Sync {
    /// Fetch one query. The returned data always has the shape of
    /// `request.kind()`.
    async fn fetch(&self, request: &QueryRequest) -> Result<QueryData, SourceError>;
}
