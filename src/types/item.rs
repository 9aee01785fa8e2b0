//! Value types for the three cascade levels.
//!
//! These are the typed shapes decoded at the gateway boundary. The rest of
//! the crate never handles raw JSON; dynamic payloads are narrowed into these
//! types (or rejected) before they reach any stage state.

use serde::{Deserialize, Serialize};

use super::ids::ItemId;

/// An item that can populate a selectable stage.
///
/// Gives the stage container and the default-selection policy a uniform view
/// of the two selectable item kinds.
pub trait StageItem {
    /// The identity of the item within its stage.
    fn id(&self) -> &ItemId;

    /// A short human-readable label for selectors.
    fn label(&self) -> String;
}

/// A top-level collection entry (e.g., a book).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionItem {
    /// Backend-assigned identity.
    pub id: ItemId,

    /// Display name shown in the selector.
    pub display_name: String,

    /// Optional grouping parent (e.g., a testament or a version), when the
    /// backend organizes collections hierarchically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ItemId>,
}

impl CollectionItem {
    /// Creates a new collection item without a grouping parent.
    pub fn new(id: impl Into<ItemId>, display_name: impl Into<String>) -> Self {
        CollectionItem {
            id: id.into(),
            display_name: display_name.into(),
            parent_id: None,
        }
    }
}

impl StageItem for CollectionItem {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn label(&self) -> String {
        self.display_name.clone()
    }
}

/// A sub-collection entry dependent on a collection (e.g., a chapter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCollectionItem {
    /// Backend-assigned identity.
    pub id: ItemId,

    /// 1-based position within the parent collection.
    pub ordinal: u32,

    /// The collection this item belongs to.
    pub parent_id: ItemId,
}

impl SubCollectionItem {
    /// Creates a new sub-collection item.
    pub fn new(id: impl Into<ItemId>, ordinal: u32, parent_id: impl Into<ItemId>) -> Self {
        SubCollectionItem {
            id: id.into(),
            ordinal,
            parent_id: parent_id.into(),
        }
    }
}

impl StageItem for SubCollectionItem {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn label(&self) -> String {
        self.ordinal.to_string()
    }
}

/// The terminal content document produced by the gateway on demand.
///
/// Not cached beyond the current leaf state; re-fetched whenever the
/// sub-collection selection changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafContent {
    /// Backend-assigned identity (matches the sub-collection item it was
    /// fetched for).
    pub id: ItemId,

    /// The content body (markup).
    pub body: String,

    /// Human-readable reference (e.g., "Genesis 3").
    pub reference: String,

    /// Attribution line (e.g., the translation name).
    pub attribution: String,
}

impl LeafContent {
    /// Creates a new leaf content document.
    pub fn new(
        id: impl Into<ItemId>,
        body: impl Into<String>,
        reference: impl Into<String>,
        attribution: impl Into<String>,
    ) -> Self {
        LeafContent {
            id: id.into(),
            body: body.into(),
            reference: reference.into(),
            attribution: attribution.into(),
        }
    }

    /// Text used by the copy/share intents: the reference plus attribution.
    pub fn share_text(&self) -> String {
        format!("{} ({})", self.reference, self.attribution)
    }
}
