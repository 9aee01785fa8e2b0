//! Per-stage fetch/selection state.
//!
//! Each selectable level of the cascade owns one `StageState`. The container
//! enforces the selection-validity invariant: a non-null selection always
//! names an element of `items`.

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, StageItem};

use super::selection::DefaultSelection;

/// The observable status of a stage.
///
/// Conceptually `Idle -> Loading -> {Populated, Errored}`, with both terminal
/// states able to re-enter `Loading` on the next parent-selection change.
/// `Populated` with zero items is the explicit "nothing available" state,
/// distinct from `Errored`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Never fetched.
    Idle,

    /// A fetch is in flight.
    Loading,

    /// The last fetch succeeded (possibly with zero items).
    Populated,

    /// The last fetch failed.
    Errored,
}

/// Outcome of an explicit selection request on a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The selection changed to the requested id.
    Selected,

    /// The requested id was already selected; nothing changed.
    Unchanged,

    /// The requested id is not among the stage's items; nothing changed.
    UnknownId,
}

/// State for one selectable level of the cascade.
#[derive(Debug, Clone)]
pub struct StageState<T> {
    items: Vec<T>,
    selected: Option<ItemId>,
    loading: bool,
    error: Option<String>,
    populated: bool,
}

impl<T> Default for StageState<T> {
    fn default() -> Self {
        StageState {
            items: Vec::new(),
            selected: None,
            loading: false,
            error: None,
            populated: false,
        }
    }
}

impl<T: StageItem> StageState<T> {
    /// Creates an empty, idle stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current items.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The current selection, if any.
    pub fn selected(&self) -> Option<&ItemId> {
        self.selected.as_ref()
    }

    /// The selected item, if a selection exists.
    pub fn selected_item(&self) -> Option<&T> {
        let selected = self.selected.as_ref()?;
        self.items.iter().find(|item| item.id() == selected)
    }

    /// The index of the selected item within `items`.
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        self.items.iter().position(|item| item.id() == selected)
    }

    /// The current error message, if the last fetch failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Derives the observable status from the flags.
    pub fn status(&self) -> StageStatus {
        if self.loading {
            StageStatus::Loading
        } else if self.error.is_some() {
            StageStatus::Errored
        } else if self.populated {
            StageStatus::Populated
        } else {
            StageStatus::Idle
        }
    }

    /// Marks a fetch as in flight and clears any previous error.
    pub fn set_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Clears the stage back to idle.
    ///
    /// Used when the parent selection changes: results of the previous parent
    /// must not linger while the new fetch is in flight.
    pub fn reset(&mut self) {
        self.items.clear();
        self.selected = None;
        self.loading = false;
        self.error = None;
        self.populated = false;
    }

    /// Replaces the items and reconciles the selection.
    ///
    /// The selection after this call is whatever `policy` chooses: the
    /// existing selection when still valid, else the policy's default. The
    /// selection can never point at a missing item.
    pub fn set_items(&mut self, items: Vec<T>, policy: &DefaultSelection) {
        self.items = items;
        self.loading = false;
        self.error = None;
        self.populated = true;
        self.selected = policy.choose(self.selected.as_ref(), &self.items);
    }

    /// Records a fetch failure, clearing the items.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
        self.items.clear();
        self.selected = None;
        self.populated = false;
    }

    /// Selects `id` if it names one of the items.
    ///
    /// Selecting an unknown id is an explicit no-op, reported as
    /// `SelectOutcome::UnknownId`. User intents racing a parent change are
    /// expected, not exceptional.
    pub fn select(&mut self, id: &ItemId) -> SelectOutcome {
        if self.selected.as_ref() == Some(id) {
            return SelectOutcome::Unchanged;
        }

        if self.items.iter().any(|item| item.id() == id) {
            self.selected = Some(id.clone());
            SelectOutcome::Selected
        } else {
            SelectOutcome::UnknownId
        }
    }
}
