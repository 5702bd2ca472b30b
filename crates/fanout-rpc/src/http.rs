//! JSON-RPC 2.0 over HTTP implementation of the store seams.
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use fanout_model::Target;

use crate::client::{StoreConnector, StoreReader};
use crate::error::{ConnectError, ReadError};

/// One target's remote store location: node URL plus store contract address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEndpoint {
    pub url: String,
    pub address: String,
}

impl HttpEndpoint {
    pub fn new(url: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            address: address.into(),
        }
    }
}

/// Connector mapping each target to an HTTP endpoint.
///
/// The underlying `reqwest::Client` holds a connection pool and is shared by
/// every reader it hands out.
pub struct HttpStoreConnector {
    endpoints: BTreeMap<String, HttpEndpoint>,
    method: String,
    client: reqwest::Client,
}

impl HttpStoreConnector {
    /// Connector with no endpoints yet, reading keys via `method`.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            endpoints: BTreeMap::new(),
            method: method.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Register the endpoint for one target, replacing any previous one.
    pub fn insert(&mut self, target: &Target, endpoint: HttpEndpoint) {
        self.endpoints
            .insert(target.as_str().to_string(), endpoint);
    }

    /// Builder form of [`HttpStoreConnector::insert`].
    pub fn with_endpoint(mut self, target: &Target, endpoint: HttpEndpoint) -> Self {
        self.insert(target, endpoint);
        self
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

#[async_trait]
impl StoreConnector for HttpStoreConnector {
    async fn connect(&self, target: &Target) -> Result<Arc<dyn StoreReader>, ConnectError> {
        let endpoint = self
            .endpoints
            .get(target.as_str())
            .cloned()
            .ok_or_else(|| ConnectError::UnknownTarget(target.as_str().to_string()))?;
        Ok(Arc::new(HttpStoreReader {
            client: self.client.clone(),
            endpoint,
            method: self.method.clone(),
        }))
    }
}

struct HttpStoreReader {
    client: reqwest::Client,
    endpoint: HttpEndpoint,
    method: String,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u32,
    method: &'a str,
    params: [&'a str; 2],
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[async_trait]
impl StoreReader for HttpStoreReader {
    async fn read(&self, key: &str) -> Result<Value, ReadError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: &self.method,
            params: [self.endpoint.address.as_str(), key],
        };

        let response = self
            .client
            .post(&self.endpoint.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ReadError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ReadError::Transport(format!("http status {status}")));
        }

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| ReadError::InvalidResponse(e.to_string()))?;
        if let Some(err) = parsed.error {
            return Err(ReadError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        parsed
            .result
            .ok_or_else(|| ReadError::InvalidResponse("neither result nor error".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpEndpoint, HttpStoreConnector, RpcRequest};
    use crate::client::StoreConnector;
    use crate::error::ConnectError;
    use fanout_model::Target;

    #[test]
    fn request_wire_shape_is_jsonrpc_two() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "store_get",
            params: ["0xabc", "Vault"],
        };
        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(
            wire,
            serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "store_get",
                "params": ["0xabc", "Vault"],
            })
        );
    }

    #[tokio::test]
    async fn connect_fails_for_unregistered_target() {
        let connector = HttpStoreConnector::new("store_get").with_endpoint(
            &Target::new("base"),
            HttpEndpoint::new("http://localhost:8545", "0xabc"),
        );

        let err = connector
            .connect(&Target::new("sepolia"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ConnectError::UnknownTarget(t) if t == "sepolia"));
    }

    #[tokio::test]
    async fn connect_succeeds_for_registered_target() {
        let connector = HttpStoreConnector::new("store_get").with_endpoint(
            &Target::new("base"),
            HttpEndpoint::new("http://localhost:8545", "0xabc"),
        );
        assert!(connector.connect(&Target::new("base")).await.is_ok());
        assert_eq!(connector.len(), 1);
    }
}
