//! Cascade controller for the three-stage dependent fetch.
//!
//! The `CascadeController` is a pure orchestrator: it computes state
//! transitions and returns fetch work as data (`FetchCommand`) to be executed
//! by the session driver. It does not perform I/O directly.
//!
//! Supersession: every issued fetch carries a monotonic `FetchSeq`. When a
//! fetch resolves, `apply_result` compares its seq against the latest seq
//! issued for that stage and silently discards the result if a newer fetch
//! has since been issued. This is the sole ordering guarantee the cascade
//! needs: a slow stale response can never overwrite state with content for
//! the wrong parent.

use thiserror::Error;

use crate::gateway::{GatewayRequest, GatewayResponse};
use crate::stage::{DefaultSelection, LeafState, SelectOutcome, StageState};
use crate::types::{CollectionItem, FetchSeq, ItemId, Stage, StageItem, SubCollectionItem};

/// Errors that can occur in controller operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    /// The stage has no items of its own to select (the leaf stage).
    #[error("stage {0} has no selectable items")]
    NotSelectable(Stage),
}

/// Sibling-navigation direction over the sub-collection items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Move to the previous sibling (clamped at index 0).
    Prev,

    /// Move to the next sibling (clamped at the last index).
    Next,
}

/// Identifies one issued fetch for supersession checks and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// The stage whose state this fetch will populate.
    pub stage: Stage,

    /// The generation number assigned at issue time.
    pub seq: FetchSeq,

    /// The parent id (or context) the fetch was issued for. Logging only;
    /// staleness is decided by `seq`.
    pub parent: String,
}

/// A fetch to execute: the gateway request plus its supersession ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCommand {
    /// Ticket to hand back with the result.
    pub ticket: FetchTicket,

    /// The gateway call to make.
    pub request: GatewayRequest,
}

/// The resolution of an issued fetch, as reported back by the driver.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The gateway call succeeded with a typed payload.
    Success(GatewayResponse),

    /// The gateway call failed; the message is user-facing.
    Failure(String),
}

/// Result of applying a resolved fetch.
#[derive(Debug)]
pub enum ApplyOutcome {
    /// The result was current and has been applied. `next` is the follow-on
    /// fetch for the dependent stage, if one is needed.
    Applied { next: Option<FetchCommand> },

    /// A newer fetch for the same stage was issued after this one; the
    /// result was discarded without touching any state.
    Stale,
}

impl ApplyOutcome {
    /// Extracts the follow-on command, if the result was applied.
    pub fn into_next(self) -> Option<FetchCommand> {
        match self {
            ApplyOutcome::Applied { next } => next,
            ApplyOutcome::Stale => None,
        }
    }
}

/// Result of a selection intent: the stage-level outcome plus the follow-on
/// fetch, if the selection changed.
#[derive(Debug)]
pub struct SelectResult {
    /// What happened to the stage's selection.
    pub outcome: SelectOutcome,

    /// The dependent stage's fetch, present only when the selection changed.
    pub command: Option<FetchCommand>,
}

/// The latest fetch issued for a stage. The request is kept so `retry` can
/// re-issue it unchanged.
#[derive(Debug, Clone)]
struct IssuedFetch {
    seq: FetchSeq,
    request: GatewayRequest,
}

/// Orchestrates the three stage states of one reading session.
///
/// Owned exclusively by one driver; all mutation happens through `&mut self`
/// on a single task, so no locking is involved.
#[derive(Debug)]
pub struct CascadeController {
    /// The collection context (e.g., the version id) used for the stage-1 fetch.
    context: String,

    collection_policy: DefaultSelection,
    sub_collection_policy: DefaultSelection,

    collections: StageState<CollectionItem>,
    sub_collections: StageState<SubCollectionItem>,
    leaf: LeafState,

    next_seq: u64,
    latest_collection: Option<IssuedFetch>,
    latest_sub_collection: Option<IssuedFetch>,
    latest_leaf: Option<IssuedFetch>,

    /// The most recent failed fetch, kept so `retry` can re-issue it.
    last_failed: Option<(Stage, GatewayRequest)>,
}

impl CascadeController {
    /// Creates a controller for the given context.
    ///
    /// `preferred_collection` is the id selected by default when present in
    /// the fetched collection items (e.g., `"genesis"`); otherwise the first
    /// item is selected. Sub-collections always default to their first item.
    pub fn new(context: impl Into<String>, preferred_collection: Option<ItemId>) -> Self {
        CascadeController {
            context: context.into(),
            collection_policy: DefaultSelection::new(preferred_collection),
            sub_collection_policy: DefaultSelection::first(),
            collections: StageState::new(),
            sub_collections: StageState::new(),
            leaf: LeafState::new(),
            next_seq: 0,
            latest_collection: None,
            latest_sub_collection: None,
            latest_leaf: None,
            last_failed: None,
        }
    }

    /// The collection stage state.
    pub fn collections(&self) -> &StageState<CollectionItem> {
        &self.collections
    }

    /// The sub-collection stage state.
    pub fn sub_collections(&self) -> &StageState<SubCollectionItem> {
        &self.sub_collections
    }

    /// The leaf content state.
    pub fn leaf(&self) -> &LeafState {
        &self.leaf
    }

    /// Begins the cascade: clears all stages and issues the stage-1 fetch.
    pub fn start(&mut self) -> FetchCommand {
        self.collections.reset();
        self.sub_collections.reset();
        self.leaf.reset();
        self.collections.set_loading();

        // Anything still in flight for the dependent stages belongs to the
        // previous lineage and must never apply.
        self.latest_sub_collection = None;
        self.latest_leaf = None;

        let context = self.context.clone();
        self.issue(Stage::Collection, GatewayRequest::CollectionItems { context })
    }

    /// Handles a user or system selection on a stage.
    ///
    /// A changed selection clears the dependent stages and issues the
    /// dependent fetch; re-selecting the current id or selecting an id not
    /// in the stage's items changes nothing and issues nothing.
    pub fn select_parent(
        &mut self,
        stage: Stage,
        id: ItemId,
    ) -> Result<SelectResult, ControllerError> {
        match stage {
            Stage::Collection => {
                let outcome = self.collections.select(&id);
                let command = match outcome {
                    SelectOutcome::Selected => Some(self.begin_sub_collection_fetch(id)),
                    SelectOutcome::Unchanged | SelectOutcome::UnknownId => None,
                };
                Ok(SelectResult { outcome, command })
            }
            Stage::SubCollection => {
                let outcome = self.sub_collections.select(&id);
                let command = match outcome {
                    SelectOutcome::Selected => Some(self.begin_leaf_fetch(id)),
                    SelectOutcome::Unchanged | SelectOutcome::UnknownId => None,
                };
                Ok(SelectResult { outcome, command })
            }
            Stage::Leaf => Err(ControllerError::NotSelectable(Stage::Leaf)),
        }
    }

    /// Applies a resolved fetch, or discards it when superseded.
    ///
    /// On success the dependent stage's default selection is derived and the
    /// follow-on fetch (if any) is returned. On failure the affected stage is
    /// marked errored; sibling stages keep their state, so a stage-2 failure
    /// never invalidates the stage-1 selection.
    pub fn apply_result(&mut self, ticket: &FetchTicket, outcome: FetchOutcome) -> ApplyOutcome {
        let current_seq = self.latest(ticket.stage).map(|issued| issued.seq);
        if current_seq != Some(ticket.seq) {
            return ApplyOutcome::Stale;
        }

        match outcome {
            FetchOutcome::Success(response) => self.apply_success(ticket.stage, response),
            FetchOutcome::Failure(message) => {
                self.apply_failure(ticket.stage, message);
                ApplyOutcome::Applied { next: None }
            }
        }
    }

    /// Moves the sub-collection selection to the previous/next sibling,
    /// clamped at the bounds (no wraparound). Returns the leaf fetch when
    /// the selection moved.
    pub fn navigate_sibling(&mut self, direction: Direction) -> Option<FetchCommand> {
        let index = self.sub_collections.selected_index()?;
        let target = match direction {
            Direction::Prev => index.checked_sub(1)?,
            Direction::Next => {
                let next = index + 1;
                if next >= self.sub_collections.items().len() {
                    return None;
                }
                next
            }
        };

        let id = self.sub_collections.items()[target].id().clone();
        self.sub_collections.select(&id);
        Some(self.begin_leaf_fetch(id))
    }

    /// Re-issues the most recent failed fetch unchanged.
    ///
    /// Returns `None` when no fetch has failed since the last retry.
    pub fn retry(&mut self) -> Option<FetchCommand> {
        let (stage, request) = self.last_failed.take()?;
        match stage {
            Stage::Collection => self.collections.set_loading(),
            Stage::SubCollection => self.sub_collections.set_loading(),
            Stage::Leaf => self.leaf.set_loading(),
        }
        Some(self.issue(stage, request))
    }

    fn begin_sub_collection_fetch(&mut self, parent: ItemId) -> FetchCommand {
        self.sub_collections.reset();
        self.sub_collections.set_loading();
        self.leaf.reset();
        // An in-flight content fetch was issued for the old parent's chapter;
        // invalidate it rather than wait for a newer leaf seq.
        self.latest_leaf = None;
        self.issue(
            Stage::SubCollection,
            GatewayRequest::SubCollectionItems { parent },
        )
    }

    fn begin_leaf_fetch(&mut self, id: ItemId) -> FetchCommand {
        self.leaf.reset();
        self.leaf.set_loading();
        self.issue(Stage::Leaf, GatewayRequest::LeafContent { id })
    }

    fn issue(&mut self, stage: Stage, request: GatewayRequest) -> FetchCommand {
        // A newer fetch supersedes any pending retry on its own stage and on
        // the stages it resets; re-issuing that retry later would load
        // content for a selection the user has already moved away from.
        let retry_superseded = self
            .last_failed
            .as_ref()
            .is_some_and(|(failed_stage, _)| Self::resets(stage, *failed_stage));
        if retry_superseded {
            self.last_failed = None;
        }

        self.next_seq += 1;
        let seq = FetchSeq(self.next_seq);

        let ticket = FetchTicket {
            stage,
            seq,
            parent: request.parent_label().to_string(),
        };
        *self.latest_mut(stage) = Some(IssuedFetch {
            seq,
            request: request.clone(),
        });

        FetchCommand { ticket, request }
    }

    /// Whether a fetch issued for `issued` invalidates state held by
    /// `other`: true for the stage itself and everything downstream of it.
    fn resets(issued: Stage, other: Stage) -> bool {
        let mut stage = Some(issued);
        while let Some(current) = stage {
            if current == other {
                return true;
            }
            stage = current.dependent();
        }
        false
    }

    fn latest(&self, stage: Stage) -> Option<&IssuedFetch> {
        match stage {
            Stage::Collection => self.latest_collection.as_ref(),
            Stage::SubCollection => self.latest_sub_collection.as_ref(),
            Stage::Leaf => self.latest_leaf.as_ref(),
        }
    }

    fn latest_mut(&mut self, stage: Stage) -> &mut Option<IssuedFetch> {
        match stage {
            Stage::Collection => &mut self.latest_collection,
            Stage::SubCollection => &mut self.latest_sub_collection,
            Stage::Leaf => &mut self.latest_leaf,
        }
    }

    fn apply_success(&mut self, stage: Stage, response: GatewayResponse) -> ApplyOutcome {
        match (stage, response) {
            (Stage::Collection, GatewayResponse::CollectionItems(items)) => {
                let policy = self.collection_policy.clone();
                self.collections.set_items(items, &policy);

                let selected = self.collections.selected().cloned();
                let next = selected.map(|selected| self.begin_sub_collection_fetch(selected));
                ApplyOutcome::Applied { next }
            }
            (Stage::SubCollection, GatewayResponse::SubCollectionItems(items)) => {
                let policy = self.sub_collection_policy.clone();
                self.sub_collections.set_items(items, &policy);

                let selected = self.sub_collections.selected().cloned();
                let next = selected.map(|selected| self.begin_leaf_fetch(selected));
                ApplyOutcome::Applied { next }
            }
            (Stage::Leaf, GatewayResponse::LeafContent(content)) => {
                self.leaf.set_content(content);
                ApplyOutcome::Applied { next: None }
            }
            (stage, _) => {
                // The interpreter answered with a payload for a different
                // action. Collapse to the generic failure path.
                self.apply_failure(stage, "gateway returned a mismatched payload".to_string());
                ApplyOutcome::Applied { next: None }
            }
        }
    }

    fn apply_failure(&mut self, stage: Stage, message: String) {
        match stage {
            Stage::Collection => self.collections.set_error(message),
            Stage::SubCollection => self.sub_collections.set_error(message),
            Stage::Leaf => self.leaf.set_error(message),
        }

        let failed_request = self.latest(stage).map(|issued| issued.request.clone());
        if let Some(request) = failed_request {
            self.last_failed = Some((stage, request));
        }
    }
}
