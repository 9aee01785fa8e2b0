//! Scripture Reader - a dependent-fetch cascade service for reading sessions.
//!
//! This library implements the three-stage cascade behind a scripture
//! reading UI: a collection selector (books), a sub-collection selector
//! (chapters), and the terminal content stage, each fetched through a remote
//! content gateway and gated on the previous stage's selection.

pub mod cascade;
pub mod config;
pub mod gateway;
pub mod server;
pub mod session;
pub mod stage;
pub mod types;

#[cfg(test)]
pub mod test_utils;
