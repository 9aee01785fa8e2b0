//! Presentation-facing snapshot of a cascade.
//!
//! The snapshot is the only view the presentation layer (here, the HTTP
//! surface) consumes: per-stage status, selector items, selection, and the
//! rendered leaf body. It is plain serializable data with no behavior.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::stage::{LeafState, StageState, StageStatus};
use crate::types::{ItemId, StageItem};

use super::controller::CascadeController;

/// One entry of a stage selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    /// The item's identity, echoed back in select intents.
    pub id: ItemId,

    /// The label to display.
    pub label: String,
}

/// The view of one selectable stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageView {
    /// Current stage status.
    pub status: StageStatus,

    /// Selector entries.
    pub items: Vec<ItemView>,

    /// The selected item id, if any.
    pub selected: Option<ItemId>,

    /// The failure message, when the status is errored.
    pub error: Option<String>,
}

impl StageView {
    fn of<T: StageItem>(stage: &StageState<T>) -> Self {
        StageView {
            status: stage.status(),
            items: stage
                .items()
                .iter()
                .map(|item| ItemView {
                    id: item.id().clone(),
                    label: item.label(),
                })
                .collect(),
            selected: stage.selected().cloned(),
            error: stage.error().map(String::from),
        }
    }
}

/// The view of the terminal content stage.
///
/// `body` is never empty when the stage is errored: it carries the inline
/// placeholder with the failure message, so the content area never renders
/// blank.
#[derive(Debug, Clone, Serialize)]
pub struct LeafView {
    /// Current stage status.
    pub status: StageStatus,

    /// The body to render (content markup, or the error placeholder).
    pub body: String,

    /// Human-readable reference of the loaded content.
    pub reference: Option<String>,

    /// Text for the copy/share intents.
    pub share_text: Option<String>,

    /// The failure message, when the status is errored.
    pub error: Option<String>,
}

impl LeafView {
    fn of(leaf: &LeafState) -> Self {
        LeafView {
            status: leaf.status(),
            body: leaf.rendered_body(),
            reference: leaf.content().map(|content| content.reference.clone()),
            share_text: leaf.content().map(|content| content.share_text()),
            error: leaf.error().map(String::from),
        }
    }
}

/// A point-in-time view of all three stages.
#[derive(Debug, Clone, Serialize)]
pub struct CascadeSnapshot {
    /// When the snapshot was taken.
    pub taken_at: DateTime<Utc>,

    /// The collection selector.
    pub collection: StageView,

    /// The sub-collection selector.
    pub sub_collection: StageView,

    /// The content area.
    pub leaf: LeafView,
}

impl CascadeSnapshot {
    /// Captures the current state of a controller.
    pub fn capture(controller: &CascadeController) -> Self {
        CascadeSnapshot {
            taken_at: Utc::now(),
            collection: StageView::of(controller.collections()),
            sub_collection: StageView::of(controller.sub_collections()),
            leaf: LeafView::of(controller.leaf()),
        }
    }
}

impl CascadeController {
    /// Convenience wrapper for [`CascadeSnapshot::capture`].
    pub fn snapshot(&self) -> CascadeSnapshot {
        CascadeSnapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::controller::{FetchOutcome, FetchTicket};
    use crate::gateway::GatewayResponse;
    use crate::types::{CollectionItem, Stage};

    #[test]
    fn snapshot_of_fresh_controller_is_all_idle() {
        let controller = CascadeController::new("kjv", None);
        let snapshot = controller.snapshot();

        assert_eq!(snapshot.collection.status, StageStatus::Idle);
        assert_eq!(snapshot.sub_collection.status, StageStatus::Idle);
        assert_eq!(snapshot.leaf.status, StageStatus::Idle);
        assert_eq!(snapshot.leaf.body, "");
    }

    #[test]
    fn snapshot_labels_come_from_items() {
        let mut controller = CascadeController::new("kjv", None);
        let command = controller.start();

        controller.apply_result(
            &command.ticket,
            FetchOutcome::Success(GatewayResponse::CollectionItems(vec![CollectionItem::new(
                "genesis", "Genesis",
            )])),
        );

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.collection.items.len(), 1);
        assert_eq!(snapshot.collection.items[0].label, "Genesis");
        assert_eq!(snapshot.collection.selected, Some("genesis".into()));
    }

    #[test]
    fn stale_ticket_leaves_the_snapshot_untouched() {
        let mut controller = CascadeController::new("kjv", None);
        let ticket = FetchTicket {
            stage: Stage::Leaf,
            seq: crate::types::FetchSeq(1),
            parent: "genesis-1".to_string(),
        };
        // No leaf fetch issued, so this ticket is stale and must not apply.
        let snapshot_before = controller.snapshot();
        controller.apply_result(&ticket, FetchOutcome::Failure("network error".to_string()));
        let snapshot_after = controller.snapshot();

        assert_eq!(snapshot_before.leaf.body, snapshot_after.leaf.body);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let controller = CascadeController::new("kjv", None);
        let json = serde_json::to_value(controller.snapshot()).unwrap();
        assert_eq!(json["collection"]["status"], "idle");
        assert_eq!(json["leaf"]["body"], "");
    }
}
