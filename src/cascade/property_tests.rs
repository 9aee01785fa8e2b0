//! Property-based tests for the cascade invariants.
//!
//! These check the selection-validity invariant and the clamped-navigation
//! contract under arbitrary operation sequences, not just the example
//! scenarios.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use super::controller::*;
use crate::gateway::GatewayResponse;
use crate::stage::{DefaultSelection, StageState};
use crate::types::{CollectionItem, ItemId, StageItem, SubCollectionItem};

fn chapters(parent: &str, count: u32) -> Vec<SubCollectionItem> {
    (1..=count)
        .map(|n| SubCollectionItem::new(format!("{}-{}", parent, n), n, parent))
        .collect()
}

/// Builds a controller whose sub-collection stage holds `count` chapters with
/// the first one selected.
fn controller_with_chapters(count: u32) -> CascadeController {
    let mut controller = CascadeController::new("kjv", Some(ItemId::new("genesis")));
    let cmd = controller.start();
    let cmd = controller
        .apply_result(
            &cmd.ticket,
            FetchOutcome::Success(GatewayResponse::CollectionItems(vec![CollectionItem::new(
                "genesis", "Genesis",
            )])),
        )
        .into_next()
        .unwrap();
    controller.apply_result(
        &cmd.ticket,
        FetchOutcome::Success(GatewayResponse::SubCollectionItems(chapters(
            "genesis", count,
        ))),
    );
    controller
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Prev), Just(Direction::Next)]
}

proptest! {
    /// Navigation never leaves the item bounds and moves by at most one
    /// index per step, matching a clamped model.
    #[test]
    fn navigation_matches_the_clamped_model(
        count in 1u32..10,
        moves in prop::collection::vec(direction_strategy(), 0..40),
    ) {
        let mut controller = controller_with_chapters(count);
        let mut model: usize = 0;

        for direction in moves {
            let before = controller.sub_collections().selected_index().unwrap();
            let moved = controller.navigate_sibling(direction).is_some();
            let after = controller.sub_collections().selected_index().unwrap();

            match direction {
                Direction::Prev => model = model.saturating_sub(1),
                Direction::Next => model = (model + 1).min(count as usize - 1),
            }

            prop_assert_eq!(after, model);
            prop_assert!(after < count as usize);
            prop_assert_eq!(moved, before != after);
        }
    }

    /// Whatever sequence of replacements and selections a stage sees, a
    /// non-null selection always names one of its items.
    #[test]
    fn stage_selection_is_always_valid(
        lists in prop::collection::vec(prop::collection::vec(0u32..20, 0..8), 1..8),
        selects in prop::collection::vec(0u32..25, 0..16),
    ) {
        let policy = DefaultSelection::preferring("item-3");
        let mut stage: StageState<CollectionItem> = StageState::new();

        let mut lists = lists.into_iter();
        if let Some(first) = lists.next() {
            stage.set_items(to_items(first), &policy);
        }

        for (i, pick) in selects.iter().enumerate() {
            stage.select(&ItemId::new(format!("item-{}", pick)));
            assert_selection_valid(&stage)?;

            // Interleave occasional list replacements.
            if i % 3 == 0 {
                if let Some(list) = lists.next() {
                    stage.set_items(to_items(list), &policy);
                    assert_selection_valid(&stage)?;
                }
            }
        }
    }
}

fn to_items(ids: Vec<u32>) -> Vec<CollectionItem> {
    let mut items: Vec<CollectionItem> = Vec::new();
    for id in ids {
        let id = format!("item-{}", id);
        if !items.iter().any(|item| item.id.as_str() == id) {
            items.push(CollectionItem::new(id.clone(), id));
        }
    }
    items
}

fn assert_selection_valid(stage: &StageState<CollectionItem>) -> Result<(), TestCaseError> {
    if let Some(selected) = stage.selected() {
        prop_assert!(
            stage.items().iter().any(|item| item.id() == selected),
            "selection {} not among items",
            selected
        );
    } else {
        // A populated, non-empty stage always carries a selection.
        prop_assert!(stage.items().is_empty());
    }
    Ok(())
}
