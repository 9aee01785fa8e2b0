//! HTTP gateway speaking to a managed function-invocation endpoint.
//!
//! The backend exposes a single endpoint that accepts
//! `{ "action": <name>, "params": <object> }` and answers with the payload
//! for that action. This module wraps a `reqwest` client scoped to one
//! endpoint URL and narrows the JSON payloads into domain types.

use serde::Serialize;
use serde_json::Value;

use crate::types::{CollectionItem, LeafContent, SubCollectionItem};

use super::{GatewayError, GatewayInterpreter, GatewayRequest, GatewayResponse};

/// The wire shape of an invocation.
#[derive(Serialize)]
struct Invocation<'a> {
    action: &'a str,
    params: Value,
}

/// A gateway client scoped to a single function-invocation endpoint.
///
/// All requests performed through one instance target the same endpoint,
/// so `GatewayRequest` variants don't carry endpoint information.
#[derive(Clone)]
pub struct FunctionGateway {
    /// The underlying HTTP client.
    client: reqwest::Client,

    /// The endpoint URL all invocations are POSTed to.
    endpoint: String,
}

impl FunctionGateway {
    /// Creates a new gateway for the given endpoint with a default client.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Creates a gateway from a pre-configured client.
    ///
    /// Use this when you need custom connection settings (proxies, TLS,
    /// connection pooling limits).
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        FunctionGateway {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Returns the endpoint this gateway is scoped to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn invoke(&self, request: &GatewayRequest) -> Result<Value, GatewayError> {
        let invocation = Invocation {
            action: request.action(),
            params: request.params(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&invocation)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

impl GatewayInterpreter for FunctionGateway {
    type Error = GatewayError;

    async fn interpret(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        let payload = self.invoke(&request).await?;

        // Narrow the payload according to the action that was requested.
        // A payload that decodes for a different action is a Mismatch, not
        // a controller concern.
        match &request {
            GatewayRequest::CollectionItems { .. } => {
                let items: Vec<CollectionItem> = serde_json::from_value(payload)
                    .map_err(|_| GatewayError::Mismatch {
                        action: request.action(),
                    })?;
                Ok(GatewayResponse::CollectionItems(items))
            }
            GatewayRequest::SubCollectionItems { .. } => {
                let items: Vec<SubCollectionItem> = serde_json::from_value(payload)
                    .map_err(|_| GatewayError::Mismatch {
                        action: request.action(),
                    })?;
                Ok(GatewayResponse::SubCollectionItems(items))
            }
            GatewayRequest::LeafContent { .. } => {
                let content: LeafContent = serde_json::from_value(payload).map_err(|_| {
                    GatewayError::Mismatch {
                        action: request.action(),
                    }
                })?;
                Ok(GatewayResponse::LeafContent(content))
            }
        }
    }
}

impl std::fmt::Debug for FunctionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionGateway")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_is_scoped_to_its_endpoint() {
        let gateway = FunctionGateway::new("https://backend.example/functions/v1/scripture");
        assert_eq!(
            gateway.endpoint(),
            "https://backend.example/functions/v1/scripture"
        );
    }

    #[test]
    fn debug_does_not_leak_client_internals() {
        let gateway = FunctionGateway::new("https://backend.example/fn");
        let rendered = format!("{:?}", gateway);
        assert!(rendered.contains("endpoint"));
        assert!(!rendered.contains("Client"));
    }

    #[test]
    fn invocation_serializes_action_and_params() {
        let request = GatewayRequest::LeafContent {
            id: crate::types::ItemId::new("genesis-3"),
        };
        let invocation = Invocation {
            action: request.action(),
            params: request.params(),
        };
        let wire = serde_json::to_value(&invocation).unwrap();
        assert_eq!(
            wire,
            serde_json::json!({
                "action": "getLeafContent",
                "params": { "subCollectionId": "genesis-3" }
            })
        );
    }
}
