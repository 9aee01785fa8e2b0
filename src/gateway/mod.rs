//! Requests-as-data for the remote content gateway.
//!
//! This module defines request types that describe gateway calls without
//! executing them. This enables:
//! - Pure cascade logic that returns fetch work as data
//! - Testability via scripted fake gateways
//! - Logging/tracing of intended calls
//!
//! The production interpreter (`FunctionGateway`) lives in [`http`].

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::future::Future;
use thiserror::Error;

use crate::types::{CollectionItem, ItemId, LeafContent, SubCollectionItem};

pub mod http;

pub use http::FunctionGateway;

/// A gateway call, described as data.
///
/// Each variant corresponds to one action of the backend's function-invocation
/// endpoint. The exact payload shapes are owned by the backend; this crate
/// only fixes the three-stage call sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request_type", rename_all = "snake_case")]
pub enum GatewayRequest {
    /// Fetch the top-level collection items for a context (e.g., a version).
    CollectionItems { context: String },

    /// Fetch the sub-collection items of one collection item.
    SubCollectionItems { parent: ItemId },

    /// Fetch the terminal content for one sub-collection item.
    LeafContent { id: ItemId },
}

impl GatewayRequest {
    /// The backend action name for this request.
    pub fn action(&self) -> &'static str {
        match self {
            GatewayRequest::CollectionItems { .. } => "getCollectionItems",
            GatewayRequest::SubCollectionItems { .. } => "getSubCollectionItems",
            GatewayRequest::LeafContent { .. } => "getLeafContent",
        }
    }

    /// The parameter object sent alongside the action name.
    pub fn params(&self) -> serde_json::Value {
        match self {
            GatewayRequest::CollectionItems { context } => json!({ "context": context }),
            GatewayRequest::SubCollectionItems { parent } => json!({ "parentId": parent }),
            GatewayRequest::LeafContent { id } => json!({ "subCollectionId": id }),
        }
    }

    /// The id (or context) this request was issued for, used for logging.
    pub fn parent_label(&self) -> &str {
        match self {
            GatewayRequest::CollectionItems { context } => context,
            GatewayRequest::SubCollectionItems { parent } => parent.as_str(),
            GatewayRequest::LeafContent { id } => id.as_str(),
        }
    }
}

/// The typed payload returned by a gateway call.
///
/// Payloads are narrowed into domain types at this boundary; raw JSON never
/// crosses into the cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayResponse {
    /// Items for the collection stage.
    CollectionItems(Vec<CollectionItem>),

    /// Items for the sub-collection stage.
    SubCollectionItems(Vec<SubCollectionItem>),

    /// The terminal content document.
    LeafContent(LeafContent),
}

/// Errors surfaced by the production gateway.
///
/// The cascade controller never inspects these; any failure collapses to a
/// user-facing message string on the affected stage.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("gateway transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("gateway returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The payload did not decode into the expected shape.
    #[error("gateway payload decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The payload decoded, but for a different action than was requested.
    #[error("gateway answered action {action} with a mismatched payload")]
    Mismatch { action: &'static str },
}

/// Interprets gateway requests against the remote content backend.
///
/// Implementations are constructed once at startup and injected into every
/// session that needs one; the cascade never reaches for an ambient client.
///
/// # Example (scripted fake for testing)
///
/// ```ignore
/// struct FakeGateway {
///     books: Vec<CollectionItem>,
/// }
///
/// impl GatewayInterpreter for FakeGateway {
///     type Error = String;
///
///     async fn interpret(&self, request: GatewayRequest) -> Result<GatewayResponse, String> {
///         match request {
///             GatewayRequest::CollectionItems { .. } => {
///                 Ok(GatewayResponse::CollectionItems(self.books.clone()))
///             }
///             other => Err(format!("unexpected request: {:?}", other)),
///         }
///     }
/// }
/// ```
pub trait GatewayInterpreter {
    /// The error type returned by this interpreter.
    type Error: std::fmt::Display + Send;

    /// Execute a gateway request and return its typed response.
    fn interpret(
        &self,
        request: GatewayRequest,
    ) -> impl Future<Output = Result<GatewayResponse, Self::Error>> + Send;
}
