//! Property-based tests for pane registry reconciliation

use panegrid_core::layout::{DropSide, LayoutTree, PaneId};
use panegrid_core::registry::{ContentRequest, ContentType, PaneRegistry};
use proptest::prelude::*;

fn drop_side_strategy() -> impl Strategy<Value = DropSide> {
    prop_oneof![
        Just(DropSide::Left),
        Just(DropSide::Right),
        Just(DropSide::Top),
        Just(DropSide::Bottom),
    ]
}

/// Builds a layout by splitting or closing panes picked by index.
fn build_tree(ops: &[(bool, usize, DropSide)]) -> LayoutTree {
    let mut tree = LayoutTree::single(PaneId::new());
    for &(close, pick, side) in ops {
        let panes = tree.pane_ids();
        if panes.is_empty() {
            tree = LayoutTree::single(PaneId::new());
            continue;
        }
        let pane = panes[pick % panes.len()];
        let Some(path) = tree.find_path_by_id(pane) else {
            continue;
        };
        let next = if close {
            tree.close(pane, &path)
        } else {
            tree.split(&path, side, PaneId::new())
        };
        if let Ok(next) = next {
            tree = next;
        }
    }
    tree
}

fn ops_strategy() -> impl Strategy<Value = Vec<(bool, usize, DropSide)>> {
    proptest::collection::vec(
        (proptest::bool::weighted(0.3), 0usize..16, drop_side_strategy()),
        0..25,
    )
}

fn sorted(mut ids: Vec<PaneId>) -> Vec<PaneId> {
    ids.sort();
    ids
}

proptest! {
    /// After sync the registry holds exactly the layout's panes.
    #[test]
    fn sync_matches_layout(first in ops_strategy(), second in ops_strategy()) {
        let mut registry = PaneRegistry::new();
        let tree = build_tree(&first);
        registry.sync(&tree);
        prop_assert_eq!(sorted(registry.ids()), sorted(tree.pane_ids()));

        let tree = build_tree(&second);
        registry.sync(&tree);
        prop_assert_eq!(sorted(registry.ids()), sorted(tree.pane_ids()));
    }

    /// A second sync with the same layout changes nothing.
    #[test]
    fn sync_is_idempotent(ops in ops_strategy()) {
        let tree = build_tree(&ops);
        let mut registry = PaneRegistry::new();
        registry.sync(&tree);
        let report = registry.sync(&tree);
        prop_assert!(report.is_noop());
    }

    /// Entries of panes that survive a layout change keep their content.
    #[test]
    fn surviving_entries_keep_content(ops in ops_strategy(), extra in 0usize..16) {
        let tree = build_tree(&ops);
        let mut registry = PaneRegistry::new();
        registry.sync(&tree);
        let panes = tree.pane_ids();
        prop_assume!(!panes.is_empty());
        let kept = panes[extra % panes.len()];
        registry.load(kept, ContentRequest::chat("kept"), 10).unwrap();

        let path = tree.find_path_by_id(kept).unwrap();
        let grown = tree.split(&path, DropSide::Right, PaneId::new()).unwrap();
        let report = registry.sync(&grown);

        prop_assert_eq!(report.created.len(), 1);
        prop_assert!(report.removed.is_empty());
        let entry = registry.get(kept).unwrap();
        prop_assert_eq!(entry.content_type, ContentType::Chat);
        prop_assert_eq!(entry.content_id.as_deref(), Some("kept"));
    }
}
