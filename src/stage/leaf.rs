//! State for the terminal content stage.
//!
//! The leaf stage holds one content document rather than a selectable list;
//! its "selection" is the sub-collection stage's selection. It carries the
//! never-blank rule: a failed leaf fetch renders an inline placeholder
//! embedding the failure message, never an empty body. That behavior is
//! intentional and load-bearing, not a fallback of convenience.

use crate::types::LeafContent;

use super::state::StageStatus;

/// State for the terminal content stage.
#[derive(Debug, Clone, Default)]
pub struct LeafState {
    content: Option<LeafContent>,
    loading: bool,
    error: Option<String>,
}

impl LeafState {
    /// Creates an empty, idle leaf stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current content document, if the last fetch succeeded.
    pub fn content(&self) -> Option<&LeafContent> {
        self.content.as_ref()
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
        } else if self.content.is_some() {
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
    pub fn reset(&mut self) {
        self.content = None;
        self.loading = false;
        self.error = None;
    }

    /// Stores a successfully fetched content document.
    pub fn set_content(&mut self, content: LeafContent) {
        self.content = Some(content);
        self.loading = false;
        self.error = None;
    }

    /// Records a fetch failure. The previous content is dropped; the
    /// rendered body becomes the error placeholder.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.content = None;
        self.loading = false;
        self.error = Some(message.into());
    }

    /// The body the presentation layer should render.
    ///
    /// On error this is a non-empty placeholder containing the failure
    /// message, so the content area is never blank.
    pub fn rendered_body(&self) -> String {
        if let Some(error) = &self.error {
            return format!("Could not load this content: {}", error);
        }
        match &self.content {
            Some(content) => content.body.clone(),
            None => String::new(),
        }
    }
}
