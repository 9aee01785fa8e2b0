//! Core domain types for the cascade.
//!
//! This module contains the fundamental types used throughout the crate,
//! designed to encode invariants via the type system.

pub mod ids;
pub mod item;

// Re-export commonly used types at the module level
pub use ids::{FetchSeq, ItemId, SessionId, Stage};
pub use item::{CollectionItem, LeafContent, StageItem, SubCollectionItem};
