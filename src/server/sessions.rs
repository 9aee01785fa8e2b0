//! Session endpoints: creation, snapshots, and intents.
//!
//! Intents are fire-and-forget: the handler forwards the message to the
//! session's mailbox and answers 202 Accepted. Clients observe the effect
//! through the snapshot endpoint, which is how the UI polls anyway.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cascade::{CascadeSnapshot, Direction};
use crate::gateway::GatewayInterpreter;
use crate::session::{RegistryError, SessionMessage};
use crate::types::{ItemId, SessionId, Stage};

use super::AppState;

/// Errors surfaced by the session endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The session does not exist (or has already ended).
    #[error("{0}")]
    NotFound(RegistryError),

    /// The session exists but its event loop is gone.
    #[error("{0}")]
    SessionGone(RegistryError),
}

impl From<RegistryError> for ApiError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::SessionNotFound(_) => ApiError::NotFound(error),
            RegistryError::ChannelClosed => ApiError::SessionGone(error),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::SessionGone(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

/// Response body for session creation.
#[derive(Debug, Serialize)]
pub struct CreatedSession {
    /// The id to use in subsequent calls.
    pub session_id: SessionId,
}

/// Body of a select intent.
#[derive(Debug, Deserialize)]
pub struct SelectIntent {
    /// The stage the selection applies to.
    pub stage: Stage,

    /// The item to select.
    pub id: ItemId,
}

/// Body of a navigate intent.
#[derive(Debug, Deserialize)]
pub struct NavigateIntent {
    /// Which sibling to move to.
    pub direction: Direction,
}

/// `POST /api/v1/sessions` - creates a session and starts its cascade.
pub async fn create_handler<G>(
    State(state): State<AppState<G>>,
) -> (StatusCode, Json<CreatedSession>)
where
    G: GatewayInterpreter + Send + Sync + 'static,
{
    let session_id = state.registry().create_session().await;
    (StatusCode::CREATED, Json(CreatedSession { session_id }))
}

/// `GET /api/v1/sessions/{id}` - returns the current cascade snapshot.
pub async fn snapshot_handler<G>(
    State(state): State<AppState<G>>,
    Path(id): Path<u64>,
) -> Result<Json<CascadeSnapshot>, ApiError>
where
    G: GatewayInterpreter + Send + Sync + 'static,
{
    let snapshot = state.registry().snapshot(SessionId(id)).await?;
    Ok(Json(snapshot))
}

/// `POST /api/v1/sessions/{id}/select` - selects an item on a stage.
pub async fn select_handler<G>(
    State(state): State<AppState<G>>,
    Path(id): Path<u64>,
    Json(intent): Json<SelectIntent>,
) -> Result<StatusCode, ApiError>
where
    G: GatewayInterpreter + Send + Sync + 'static,
{
    state
        .registry()
        .send(
            SessionId(id),
            SessionMessage::Select {
                stage: intent.stage,
                id: intent.id,
            },
        )
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// `POST /api/v1/sessions/{id}/navigate` - moves to a sibling chapter.
pub async fn navigate_handler<G>(
    State(state): State<AppState<G>>,
    Path(id): Path<u64>,
    Json(intent): Json<NavigateIntent>,
) -> Result<StatusCode, ApiError>
where
    G: GatewayInterpreter + Send + Sync + 'static,
{
    state
        .registry()
        .send(
            SessionId(id),
            SessionMessage::Navigate {
                direction: intent.direction,
            },
        )
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// `POST /api/v1/sessions/{id}/retry` - re-issues the last failed fetch.
pub async fn retry_handler<G>(
    State(state): State<AppState<G>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError>
where
    G: GatewayInterpreter + Send + Sync + 'static,
{
    state
        .registry()
        .send(SessionId(id), SessionMessage::Retry)
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// `DELETE /api/v1/sessions/{id}` - ends a session.
pub async fn end_handler<G>(
    State(state): State<AppState<G>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError>
where
    G: GatewayInterpreter + Send + Sync + 'static,
{
    state.registry().end_session(SessionId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
