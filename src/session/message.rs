//! Session message types for async communication.
//!
//! This module defines the messages that can be sent to a reading session.
//! Sessions receive these messages via an async channel and process them
//! serially in their event loop, which is what keeps all cascade mutation on
//! a single task.

use tokio::sync::oneshot;

use crate::cascade::{CascadeSnapshot, Direction, FetchOutcome, FetchTicket};
use crate::types::{ItemId, Stage};

/// Messages that can be sent to a reading session.
///
/// Sessions receive these via `tokio::sync::mpsc` and process them serially,
/// so user intents and fetch completions interleave in a single ordered
/// stream.
#[derive(Debug)]
pub enum SessionMessage {
    /// A user selected an item on a stage.
    Select {
        /// The stage the selection applies to.
        stage: Stage,
        /// The selected item id.
        id: ItemId,
    },

    /// A user moved the chapter selection to the previous/next sibling.
    Navigate {
        /// The navigation direction (clamped at the bounds).
        direction: Direction,
    },

    /// Re-issue the most recent failed fetch unchanged.
    Retry,

    /// A spawned gateway call resolved.
    ///
    /// The ticket identifies the fetch; the controller decides whether the
    /// result is still current or has been superseded.
    FetchResolved {
        /// The ticket issued with the fetch.
        ticket: FetchTicket,
        /// How the fetch resolved.
        outcome: FetchOutcome,
    },

    /// Request a point-in-time snapshot of the three stages.
    Snapshot {
        /// Channel the snapshot is sent back on.
        reply: oneshot::Sender<CascadeSnapshot>,
    },

    /// Request a graceful shutdown of the session's event loop.
    Shutdown,
}
