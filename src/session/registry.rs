//! Session registry: creates sessions on demand and routes messages to them.
//!
//! One registry instance exists per process. It holds the single gateway
//! instance and hands an `Arc` of it to every session it spawns, so the
//! transport's lifecycle stays outside the cascade. Sessions run
//! concurrently with each other, but each session processes its own
//! messages strictly serially.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cascade::CascadeSnapshot;
use crate::gateway::GatewayInterpreter;
use crate::types::SessionId;

use super::message::SessionMessage;
use super::worker::{ReaderSession, SessionConfig, SessionHandle};

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No session exists with the given id.
    #[error("no session found: {0}")]
    SessionNotFound(SessionId),

    /// The session's event loop has exited.
    #[error("failed to send message to session: channel closed")]
    ChannelClosed,
}

/// Creates, tracks, and shuts down reading sessions.
pub struct SessionRegistry<G> {
    gateway: Arc<G>,
    config: SessionConfig,
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    next_id: AtomicU64,
    cancel: CancellationToken,
}

impl<G> SessionRegistry<G>
where
    G: GatewayInterpreter + Send + Sync + 'static,
{
    /// Creates a registry that spawns sessions against the given gateway.
    ///
    /// `cancel` is the process-wide shutdown token; each session gets a
    /// child token, so cancelling it stops every session.
    pub fn new(gateway: Arc<G>, config: SessionConfig, cancel: CancellationToken) -> Self {
        SessionRegistry {
            gateway,
            config,
            sessions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            cancel,
        }
    }

    /// Spawns a new session and returns its id. The cascade's stage-1 fetch
    /// is issued immediately.
    pub async fn create_session(&self) -> SessionId {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let handle = ReaderSession::spawn(
            id,
            &self.config,
            Arc::clone(&self.gateway),
            self.cancel.child_token(),
        );

        self.sessions.write().await.insert(id, handle);
        info!(session = %id, "created reading session");
        id
    }

    /// Sends a message to a session.
    pub async fn send(&self, id: SessionId, message: SessionMessage) -> Result<(), RegistryError> {
        let sender = {
            let sessions = self.sessions.read().await;
            let handle = sessions
                .get(&id)
                .ok_or(RegistryError::SessionNotFound(id))?;
            handle.sender()
        };

        sender
            .send(message)
            .await
            .map_err(|_| RegistryError::ChannelClosed)
    }

    /// Requests a snapshot from a session and waits for the reply.
    pub async fn snapshot(&self, id: SessionId) -> Result<CascadeSnapshot, RegistryError> {
        let (reply, rx) = tokio::sync::oneshot::channel();
        self.send(id, SessionMessage::Snapshot { reply }).await?;
        rx.await.map_err(|_| RegistryError::ChannelClosed)
    }

    /// Ends a session, waiting for its event loop to exit.
    pub async fn end_session(&self, id: SessionId) -> Result<(), RegistryError> {
        let handle = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or(RegistryError::SessionNotFound(id))?;

        let lived = Utc::now() - handle.created_at();
        handle.shutdown().await;
        debug!(session = %id, lived = %lived, "ended reading session");
        Ok(())
    }

    /// Returns the number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Shuts down every session, waiting for each event loop to exit.
    pub async fn shutdown_all(&self) {
        let handles: Vec<SessionHandle> = {
            let mut sessions = self.sessions.write().await;
            sessions.drain().map(|(_, handle)| handle).collect()
        };

        for handle in handles {
            handle.shutdown().await;
        }
        info!("all reading sessions shut down");
    }
}

impl<G> std::fmt::Debug for SessionRegistry<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
