//! Reading sessions: per-session event loops and the process-wide registry.
//!
//! A session is the unit of cascade ownership. The registry spawns one task
//! per session; that task owns the session's `CascadeController` exclusively
//! and processes intents, fetch completions, and snapshot queries serially.

pub mod message;
pub mod registry;
pub mod worker;


pub use message::SessionMessage;
pub use registry::{RegistryError, SessionRegistry};
pub use worker::{ReaderSession, SessionConfig, SessionError, SessionHandle};
