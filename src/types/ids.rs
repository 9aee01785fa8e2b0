//! Newtype wrappers for domain identifiers.
//!
//! These types prevent accidental mixing of different ID kinds (e.g., using a
//! SessionId where an ItemId is expected) and make the code more self-documenting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The identity of a cascade item (collection, sub-collection, or leaf).
///
/// Item ids are opaque strings assigned by the backend (e.g., `"genesis"`,
/// `"genesis-3"`). Equality on the id is the only identity notion in the cascade.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    /// Creates a new ItemId from a string.
    pub fn new(s: impl Into<String>) -> Self {
        ItemId(s.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_string())
    }
}

/// A reading-session identifier, assigned by the session registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

impl From<u64> for SessionId {
    fn from(n: u64) -> Self {
        SessionId(n)
    }
}

/// A monotonic fetch generation number.
///
/// Every fetch issued by a cascade controller is tagged with the next
/// `FetchSeq`. A resolved fetch is applied only if its seq is still the
/// latest issued for its stage; otherwise the result is stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FetchSeq(pub u64);

impl fmt::Display for FetchSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fetch-{}", self.0)
    }
}

/// The three levels of the dependent-fetch cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// The top-level collection selector (e.g., books).
    Collection,

    /// The mid-level selector dependent on the collection (e.g., chapters).
    SubCollection,

    /// The terminal content stage dependent on the sub-collection.
    Leaf,
}

impl Stage {
    /// Returns the stage whose fetch depends on this stage's selection,
    /// or `None` for the terminal stage.
    pub fn dependent(&self) -> Option<Stage> {
        match self {
            Stage::Collection => Some(Stage::SubCollection),
            Stage::SubCollection => Some(Stage::Leaf),
            Stage::Leaf => None,
        }
    }

    /// Returns a short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Collection => "collection",
            Stage::SubCollection => "sub_collection",
            Stage::Leaf => "leaf",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_display_and_eq() {
        let id = ItemId::new("genesis");
        assert_eq!(id.to_string(), "genesis");
        assert_eq!(id, ItemId::from("genesis"));
    }

    #[test]
    fn fetch_seq_orders_monotonically() {
        assert!(FetchSeq(2) > FetchSeq(1));
    }

    #[test]
    fn stage_dependents_chain_to_leaf() {
        assert_eq!(Stage::Collection.dependent(), Some(Stage::SubCollection));
        assert_eq!(Stage::SubCollection.dependent(), Some(Stage::Leaf));
        assert_eq!(Stage::Leaf.dependent(), None);
    }
}
