//! Default-selection policy for freshly populated stages.
//!
//! Pure policy function: given the current selection and a new item list,
//! decide what the selection should be so it never dangles.

use crate::types::{ItemId, StageItem};

/// Decides the selection after a stage's items are replaced.
///
/// Resolution order:
/// 1. the current selection, if it still names an element of the new items;
/// 2. the preferred id, if configured and present (e.g., `"genesis"`);
/// 3. the first item;
/// 4. none, when the list is empty.
#[derive(Debug, Clone, Default)]
pub struct DefaultSelection {
    preferred: Option<ItemId>,
}

impl DefaultSelection {
    /// A policy with no preferred id: keep-current, else first item.
    pub fn first() -> Self {
        DefaultSelection { preferred: None }
    }

    /// A policy preferring the given id when it is present.
    pub fn preferring(id: impl Into<ItemId>) -> Self {
        DefaultSelection {
            preferred: Some(id.into()),
        }
    }

    /// Builds a policy from an optional preferred id.
    pub fn new(preferred: Option<ItemId>) -> Self {
        DefaultSelection { preferred }
    }

    /// Computes the selection for `items`, given the previous selection.
    pub fn choose<T: StageItem>(&self, current: Option<&ItemId>, items: &[T]) -> Option<ItemId> {
        if let Some(current) = current {
            if items.iter().any(|item| item.id() == current) {
                return Some(current.clone());
            }
        }

        if let Some(preferred) = &self.preferred {
            if items.iter().any(|item| item.id() == preferred) {
                return Some(preferred.clone());
            }
        }

        items.first().map(|item| item.id().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CollectionItem;

    fn books() -> Vec<CollectionItem> {
        vec![
            CollectionItem::new("genesis", "Genesis"),
            CollectionItem::new("exodus", "Exodus"),
        ]
    }

    #[test]
    fn preferred_id_wins_when_present() {
        let policy = DefaultSelection::preferring("genesis");
        let items = vec![
            CollectionItem::new("exodus", "Exodus"),
            CollectionItem::new("genesis", "Genesis"),
        ];
        assert_eq!(policy.choose(None, &items), Some(ItemId::new("genesis")));
    }

    #[test]
    fn falls_back_to_first_when_preferred_absent() {
        let policy = DefaultSelection::preferring("psalms");
        assert_eq!(policy.choose(None, &books()), Some(ItemId::new("genesis")));
    }

    #[test]
    fn empty_items_yield_no_selection() {
        let policy = DefaultSelection::preferring("genesis");
        let items: Vec<CollectionItem> = vec![];
        assert_eq!(policy.choose(None, &items), None);
    }

    #[test]
    fn current_selection_survives_if_still_present() {
        let policy = DefaultSelection::preferring("genesis");
        let current = ItemId::new("exodus");
        assert_eq!(
            policy.choose(Some(&current), &books()),
            Some(ItemId::new("exodus"))
        );
    }

    #[test]
    fn stale_current_selection_is_replaced() {
        let policy = DefaultSelection::first();
        let current = ItemId::new("leviticus");
        assert_eq!(
            policy.choose(Some(&current), &books()),
            Some(ItemId::new("genesis"))
        );
    }
}
