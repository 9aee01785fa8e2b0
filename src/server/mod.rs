//! HTTP server exposing reading sessions.
//!
//! This is the presentation layer's transport: it turns HTTP calls into
//! session intents and snapshots. The server holds no cascade state of its
//! own; everything lives in the per-session event loops behind the registry.
//!
//! # Endpoints
//!
//! - `POST   /api/v1/sessions` - Create a session (starts the cascade)
//! - `GET    /api/v1/sessions/{id}` - Snapshot of the three stages as JSON
//! - `POST   /api/v1/sessions/{id}/select` - Select an item on a stage
//! - `POST   /api/v1/sessions/{id}/navigate` - Move to a sibling chapter
//! - `POST   /api/v1/sessions/{id}/retry` - Re-issue the last failed fetch
//! - `DELETE /api/v1/sessions/{id}` - End a session
//! - `GET    /health` - Returns 200 if the server is running

use std::sync::Arc;

use crate::gateway::GatewayInterpreter;
use crate::session::SessionRegistry;

pub mod health;
pub mod sessions;

pub use health::health_handler;

/// Shared application state.
///
/// This is passed to all handlers via Axum's `State` extractor. It contains
/// only the session registry; the gateway is owned by the registry.
pub struct AppState<G> {
    registry: Arc<SessionRegistry<G>>,
}

impl<G> AppState<G> {
    /// Creates a new `AppState` around a registry.
    pub fn new(registry: Arc<SessionRegistry<G>>) -> Self {
        AppState { registry }
    }

    /// Returns the session registry.
    pub fn registry(&self) -> &SessionRegistry<G> {
        &self.registry
    }
}

impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        AppState {
            registry: Arc::clone(&self.registry),
        }
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router<G>(app_state: AppState<G>) -> axum::Router
where
    G: GatewayInterpreter + Send + Sync + 'static,
{
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/api/v1/sessions", post(sessions::create_handler))
        .route(
            "/api/v1/sessions/{id}",
            get(sessions::snapshot_handler).delete(sessions::end_handler),
        )
        .route("/api/v1/sessions/{id}/select", post(sessions::select_handler))
        .route(
            "/api/v1/sessions/{id}/navigate",
            post(sessions::navigate_handler),
        )
        .route("/api/v1/sessions/{id}/retry", post(sessions::retry_handler))
        .route("/health", get(health_handler))
        .with_state(app_state)
}
