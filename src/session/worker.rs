//! Per-session event loop driving one cascade controller.
//!
//! Each reading session gets a dedicated task that processes messages
//! serially. The task owns its `CascadeController` exclusively; no other
//! task ever touches a session's stage states, so no locking is involved.
//!
//! # Fetch execution
//!
//! Fetch commands returned by the controller are executed by spawning the
//! gateway call and posting the result back to the session's own mailbox as
//! a `FetchResolved` message. Cancellation is logical only: a superseded
//! fetch task runs to completion and its result is dropped by
//! `apply_result`, which is all the ordering guarantee the cascade needs.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace, warn};

use crate::cascade::{ApplyOutcome, CascadeController, CascadeSnapshot, FetchCommand, FetchOutcome};
use crate::gateway::GatewayInterpreter;
use crate::stage::SelectOutcome;
use crate::types::{ItemId, SessionId};

use super::message::SessionMessage;

/// Errors that can occur when talking to a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session's event loop has exited and its channel is closed.
    #[error("session channel closed")]
    ChannelClosed,
}

/// Configuration shared by all sessions created from one registry.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The collection context the stage-1 fetch is issued for (e.g., the
    /// version id).
    pub context: String,

    /// Collection id selected by default when present (e.g., `"genesis"`).
    pub preferred_collection: Option<ItemId>,

    /// Optional per-fetch deadline. A fetch exceeding it resolves as a
    /// generic failure. `None` means no deadline.
    pub fetch_timeout: Option<Duration>,

    /// Capacity of the session mailbox.
    pub channel_capacity: usize,
}

impl SessionConfig {
    /// Creates a config for the given context with defaults: no preferred
    /// collection, no fetch timeout, mailbox capacity 32.
    pub fn new(context: impl Into<String>) -> Self {
        SessionConfig {
            context: context.into(),
            preferred_collection: None,
            fetch_timeout: None,
            channel_capacity: 32,
        }
    }
}

/// Handle to a running session: its mailbox plus lifecycle metadata.
#[derive(Debug)]
pub struct SessionHandle {
    id: SessionId,
    tx: mpsc::Sender<SessionMessage>,
    created_at: DateTime<Utc>,
    join: JoinHandle<()>,
}

impl SessionHandle {
    /// The session's id.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// When the session was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// A clone of the session's mailbox sender.
    pub fn sender(&self) -> mpsc::Sender<SessionMessage> {
        self.tx.clone()
    }

    /// Sends a message to the session.
    pub async fn send(&self, message: SessionMessage) -> Result<(), SessionError> {
        self.tx
            .send(message)
            .await
            .map_err(|_| SessionError::ChannelClosed)
    }

    /// Requests a snapshot and waits for the reply.
    pub async fn snapshot(&self) -> Result<CascadeSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionMessage::Snapshot { reply }).await?;
        rx.await.map_err(|_| SessionError::ChannelClosed)
    }

    /// Asks the session to exit and waits for its task to finish.
    pub async fn shutdown(self) {
        let _ = self.tx.send(SessionMessage::Shutdown).await;
        let _ = self.join.await;
    }
}

/// The event loop owning one cascade controller.
pub struct ReaderSession<G> {
    id: SessionId,
    controller: CascadeController,
    gateway: Arc<G>,
    rx: mpsc::Receiver<SessionMessage>,
    /// Sender for fetch tasks to post their results back.
    self_tx: mpsc::Sender<SessionMessage>,
    cancel: CancellationToken,
    fetch_timeout: Option<Duration>,
}

impl<G> ReaderSession<G>
where
    G: GatewayInterpreter + Send + Sync + 'static,
{
    /// Spawns a session task and returns its handle.
    ///
    /// The cascade starts immediately: the stage-1 fetch is issued before
    /// the first message is processed.
    pub fn spawn(
        id: SessionId,
        config: &SessionConfig,
        gateway: Arc<G>,
        cancel: CancellationToken,
    ) -> SessionHandle {
        let (tx, rx) = mpsc::channel(config.channel_capacity);
        let session = ReaderSession {
            id,
            controller: CascadeController::new(
                config.context.clone(),
                config.preferred_collection.clone(),
            ),
            gateway,
            rx,
            self_tx: tx.clone(),
            cancel,
            fetch_timeout: config.fetch_timeout,
        };

        let join = tokio::spawn(session.run());

        SessionHandle {
            id,
            tx,
            created_at: Utc::now(),
            join,
        }
    }

    #[instrument(skip(self), fields(session = %self.id))]
    async fn run(mut self) {
        let command = self.controller.start();
        self.dispatch_fetch(command);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!("session cancelled");
                    break;
                }
                message = self.rx.recv() => {
                    match message {
                        Some(message) => {
                            if !self.handle(message) {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
        }

        debug!("session event loop exited");
    }

    /// Processes one message. Returns false when the loop should exit.
    fn handle(&mut self, message: SessionMessage) -> bool {
        match message {
            SessionMessage::Select { stage, id } => match self.controller.select_parent(stage, id)
            {
                Ok(result) => {
                    if result.outcome == SelectOutcome::UnknownId {
                        debug!(stage = %stage, "select intent named an unknown id");
                    }
                    if let Some(command) = result.command {
                        self.dispatch_fetch(command);
                    }
                }
                Err(error) => warn!(%error, "rejected select intent"),
            },
            SessionMessage::Navigate { direction } => {
                match self.controller.navigate_sibling(direction) {
                    Some(command) => self.dispatch_fetch(command),
                    None => trace!(?direction, "navigation clamped at bounds"),
                }
            }
            SessionMessage::Retry => match self.controller.retry() {
                Some(command) => self.dispatch_fetch(command),
                None => trace!("retry requested with no failed fetch"),
            },
            SessionMessage::FetchResolved { ticket, outcome } => {
                match self.controller.apply_result(&ticket, outcome) {
                    ApplyOutcome::Stale => {
                        debug!(stage = %ticket.stage, seq = %ticket.seq, "discarded stale fetch result");
                    }
                    ApplyOutcome::Applied { next } => {
                        if let Some(command) = next {
                            self.dispatch_fetch(command);
                        }
                    }
                }
            }
            SessionMessage::Snapshot { reply } => {
                let _ = reply.send(self.controller.snapshot());
            }
            SessionMessage::Shutdown => return false,
        }
        true
    }

    /// Executes a fetch command by spawning the gateway call.
    ///
    /// The spawned task posts the result back as `FetchResolved`; if the
    /// session has exited by then, the send fails and the result is dropped.
    fn dispatch_fetch(&self, command: FetchCommand) {
        let FetchCommand { ticket, request } = command;
        debug!(
            stage = %ticket.stage,
            seq = %ticket.seq,
            parent = %ticket.parent,
            "issuing fetch"
        );

        let gateway = Arc::clone(&self.gateway);
        let tx = self.self_tx.clone();
        let fetch_timeout = self.fetch_timeout;

        tokio::spawn(async move {
            let result = match fetch_timeout {
                Some(limit) => match tokio::time::timeout(limit, gateway.interpret(request)).await
                {
                    Ok(result) => result.map_err(|error| error.to_string()),
                    Err(_) => Err(format!("fetch timed out after {:?}", limit)),
                },
                None => gateway
                    .interpret(request)
                    .await
                    .map_err(|error| error.to_string()),
            };

            let outcome = match result {
                Ok(response) => FetchOutcome::Success(response),
                Err(message) => FetchOutcome::Failure(message),
            };

            let _ = tx.send(SessionMessage::FetchResolved { ticket, outcome }).await;
        });
    }
}
