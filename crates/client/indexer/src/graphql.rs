//! GraphQL indexer client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::queries::{QueryData, QueryRequest};
use crate::source::{ReadModelSource, SourceError};

pub const DEFAULT_INDEXER_URL: &str = "http://localhost:8080/graphql";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Indexer endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerConfig {
    pub url: String,
    pub request_timeout: Duration,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_INDEXER_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl IndexerConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Load from environment variables.
    ///
    /// - `INDEXER_URL`: GraphQL endpoint
    /// - `INDEXER_TIMEOUT_SECS`: per-request timeout
    pub fn from_env() -> Result<Self, SourceError> {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("INDEXER_URL") {
            config.url = url;
        }
        if let Ok(secs) = std::env::var("INDEXER_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|e| {
                SourceError::Config(format!("Invalid INDEXER_TIMEOUT_SECS '{secs}': {e}"))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SourceError> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(SourceError::Config(format!(
                "Indexer URL must start with http:// or https://, got '{}'",
                self.url
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(SourceError::Config(
                "Indexer request timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// Read-model source backed by the GraphQL indexer.
pub struct GraphqlIndexer {
    config: IndexerConfig,
    http_client: reqwest::Client,
}

impl GraphqlIndexer {
    pub fn new(config: IndexerConfig) -> Result<Self, SourceError> {
        config.validate()?;
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SourceError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    async fn post(&self, request: &QueryRequest) -> Result<GraphqlResponse, SourceError> {
        let body = json!({
            "query": request.document(),
            "variables": request.variables(),
        });

        let response = self
            .http_client
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SourceError::Network(format!(
                "Indexer returned status {status}: {error_text}"
            )));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read indexer response: {e}")))?;

        serde_json::from_str(&response_text).map_err(|e| SourceError::Decode {
            field: "response",
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ReadModelSource for GraphqlIndexer {
    async fn fetch(&self, request: &QueryRequest) -> Result<QueryData, SourceError> {
        tracing::debug!(query = %request.kind(), "Querying indexer");
        let response = self.post(request).await?;
        decode(request, response)
    }
}

fn decode(request: &QueryRequest, response: GraphqlResponse) -> Result<QueryData, SourceError> {
    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(SourceError::Graphql(messages.join("; ")));
    }

    let field = request.root_field();
    let records = response
        .data
        .and_then(|mut data| data.get_mut(field).map(Value::take))
        .unwrap_or(Value::Null);

    use crate::queries::QueryKind::*;
    Ok(match request.kind() {
        AdventurerById => QueryData::Adventurers(records_of(field, records)?),
        ItemsByAdventurer => QueryData::Items(records_of(field, records)?),
        LastBeastDiscovery | LatestDiscovery => {
            QueryData::Discoveries(records_of(field, records)?)
        }
        BeastById => QueryData::Beasts(records_of(field, records)?),
        BattlesByBeast | LastBattle => QueryData::Battles(records_of(field, records)?),
    })
}

/// A missing or null list decodes as empty.
fn records_of<T: DeserializeOwned>(field: &'static str, value: Value) -> Result<Vec<T>, SourceError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value).map_err(|e| SourceError::Decode {
        field,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use survivor_core::{Attacker, DiscoveryType};

    use super::*;

    fn response(value: Value) -> GraphqlResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn decodes_discoveries_with_string_ids() {
        let request = QueryRequest::LastBeastDiscovery { adventurer_id: 5 };
        let data = decode(
            &request,
            response(json!({
                "data": { "discoveries": [{
                    "adventurerId": 5,
                    "discoveryType": "Beast",
                    "entityId": "21",
                    "timestamp": "2023-07-01T12:00:00Z"
                }]}
            })),
        )
        .unwrap();

        match data {
            QueryData::Discoveries(found) => {
                assert_eq!(found[0].discovery_type, DiscoveryType::Beast);
                assert_eq!(found[0].beast_id(), Some(21));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn decodes_battles() {
        let request = QueryRequest::BattlesByBeast {
            adventurer_id: 5,
            beast_id: 21,
        };
        let data = decode(
            &request,
            response(json!({
                "data": { "battles": [{
                    "beastId": 21, "adventurerId": 5, "attacker": "Beast",
                    "fled": false, "damage": 7, "targetHealth": 93,
                    "xpEarned": null, "goldEarned": 0, "timestamp": null
                }]}
            })),
        )
        .unwrap();

        match data {
            QueryData::Battles(battles) => {
                assert_eq!(battles[0].attacker, Attacker::Beast);
                assert_eq!(battles[0].xp_earned, 0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn explicit_nulls_decode_as_defaults() {
        let discovery = decode(
            &QueryRequest::LatestDiscovery { adventurer_id: 5 },
            response(json!({
                "data": { "discoveries": [{
                    "adventurerId": 5, "discoveryType": null,
                    "entityId": null, "timestamp": null
                }]}
            })),
        )
        .unwrap();
        match discovery {
            QueryData::Discoveries(found) => {
                assert_eq!(found[0].discovery_type, DiscoveryType::Nothing);
            }
            other => panic!("unexpected {other:?}"),
        }

        let battle = decode(
            &QueryRequest::LastBattle { adventurer_id: 5 },
            response(json!({
                "data": { "battles": [{
                    "beastId": 21, "adventurerId": 5, "attacker": null,
                    "fled": null, "damage": 2, "targetHealth": 8
                }]}
            })),
        )
        .unwrap();
        match battle {
            QueryData::Battles(battles) => {
                assert_eq!(battles[0].attacker, Attacker::Adventurer);
                assert!(!battles[0].fled);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn graphql_errors_fail_the_fetch() {
        let request = QueryRequest::BeastById { beast_id: 1 };
        let result = decode(
            &request,
            response(json!({ "errors": [{ "message": "bad field" }, { "message": "oops" }] })),
        );
        assert_eq!(result, Err(SourceError::Graphql("bad field; oops".into())));
    }

    #[test]
    fn null_list_is_empty() {
        let request = QueryRequest::ItemsByAdventurer { adventurer_id: 1 };
        let data = decode(&request, response(json!({ "data": { "items": null } }))).unwrap();
        assert_eq!(data, QueryData::Items(vec![]));
    }

    #[test]
    fn malformed_record_is_decode_error() {
        let request = QueryRequest::BeastById { beast_id: 1 };
        let result = decode(
            &request,
            response(json!({ "data": { "beasts": [{ "health": "lots" }] } })),
        );
        assert!(matches!(result, Err(SourceError::Decode { field: "beasts", .. })));
    }

    #[test]
    fn rejects_non_http_url() {
        assert!(IndexerConfig::new("ftp://indexer").validate().is_err());
        assert!(IndexerConfig::default().validate().is_ok());
    }
}
