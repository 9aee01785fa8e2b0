//! The dependent-fetch cascade core.
//!
//! This module implements the three-stage cascade state machine that drives
//! a reading session. It orchestrates:
//!
//! - **Stage wiring**: a selection change at stage N clears the dependent
//!   stages and schedules exactly one fetch for stage N+1
//! - **Supersession**: at most one fetch's result is ever applied per stage;
//!   stale results are silently dropped
//! - **Default selection**: freshly populated stages auto-select a preferred
//!   or first item, which in turn schedules the next stage's fetch
//!
//! # Architecture
//!
//! The cascade follows the effects-as-data pattern:
//! - Pure controller methods compute state transitions and return
//!   `FetchCommand` values
//! - Commands are executed by the session driver against a gateway
//!   interpreter, and results are fed back through `apply_result`
//! - This enables thorough testing without I/O
//!
//! # Key Invariants
//!
//! 1. **Selection validity**: a non-null selection always names an element
//!    of the stage's items.
//!
//! 2. **Supersession**: a fetch result is applied only if its `FetchSeq` is
//!    still the latest issued for its stage.
//!
//! 3. **Error isolation**: a failure marks only its own stage; upstream
//!    selections stay intact and interactive.

pub mod controller;
pub mod snapshot;


#[cfg(test)]
mod property_tests;

// Re-export commonly used types
pub use controller::{
    ApplyOutcome, CascadeController, ControllerError, Direction, FetchCommand, FetchOutcome,
    FetchTicket, SelectResult,
};
pub use snapshot::{CascadeSnapshot, ItemView, LeafView, StageView};
