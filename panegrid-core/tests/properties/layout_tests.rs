//! Property-based tests for the layout tree
//!
//! Random sequences of split, close, move and resize must always leave a
//! tree that satisfies every structural invariant.

use panegrid_core::layout::{
    DEFAULT_MIN_PANE_PERCENT, DropSide, LayoutNode, LayoutTree, PaneId, SIZE_EPSILON,
};
use proptest::prelude::*;

// ============================================================================
// Test Strategies
// ============================================================================

fn drop_side_strategy() -> impl Strategy<Value = DropSide> {
    prop_oneof![
        Just(DropSide::Left),
        Just(DropSide::Right),
        Just(DropSide::Top),
        Just(DropSide::Bottom),
    ]
}

/// Operation on a layout, with panes addressed by index into `pane_ids`
#[derive(Debug, Clone)]
enum LayoutOp {
    Split { target: usize, side: DropSide },
    Close { target: usize },
    Move { source: usize, target: usize, side: DropSide },
    Resize { pick: usize, delta: f64 },
}

fn layout_op_strategy() -> impl Strategy<Value = LayoutOp> {
    prop_oneof![
        3 => (0usize..16, drop_side_strategy())
            .prop_map(|(target, side)| LayoutOp::Split { target, side }),
        1 => (0usize..16).prop_map(|target| LayoutOp::Close { target }),
        2 => (0usize..16, 0usize..16, drop_side_strategy())
            .prop_map(|(source, target, side)| LayoutOp::Move { source, target, side }),
        2 => (0usize..16, -80.0f64..80.0).prop_map(|(pick, delta)| LayoutOp::Resize { pick, delta }),
    ]
}

/// Index paths of every split node, in pre-order
fn split_paths(node: &LayoutNode, path: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
    if let LayoutNode::Split(split) = node {
        out.push(path.clone());
        for (index, child) in split.children.iter().enumerate() {
            path.push(index);
            split_paths(child, path, out);
            path.pop();
        }
    }
}

/// Applies one operation; errors leave the tree as it was.
fn apply(tree: &LayoutTree, op: &LayoutOp) -> LayoutTree {
    let panes = tree.pane_ids();
    if panes.is_empty() {
        return LayoutTree::single(PaneId::new());
    }
    let result = match op {
        LayoutOp::Split { target, side } => {
            let pane = panes[target % panes.len()];
            let path = tree.find_path_by_id(pane).unwrap();
            tree.split(&path, *side, PaneId::new())
        }
        LayoutOp::Close { target } => {
            let pane = panes[target % panes.len()];
            let path = tree.find_path_by_id(pane).unwrap();
            tree.close(pane, &path)
        }
        LayoutOp::Move { source, target, side } => {
            let source = tree.find_path_by_id(panes[source % panes.len()]).unwrap();
            let target = tree.find_path_by_id(panes[target % panes.len()]).unwrap();
            tree.move_node(&source, &target, *side)
        }
        LayoutOp::Resize { pick, delta } => {
            let mut paths = Vec::new();
            if let Some(root) = tree.root() {
                split_paths(root, &mut Vec::new(), &mut paths);
            }
            if paths.is_empty() {
                return tree.clone();
            }
            let path = &paths[pick % paths.len()];
            tree.resize(path, 0, *delta, DEFAULT_MIN_PANE_PERCENT)
        }
    };
    result.unwrap_or_else(|_| tree.clone())
}

fn sorted(mut ids: Vec<PaneId>) -> Vec<PaneId> {
    ids.sort();
    ids
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Every reachable tree satisfies the structural invariants.
    #[test]
    fn operations_preserve_invariants(ops in proptest::collection::vec(layout_op_strategy(), 1..40)) {
        let mut tree = LayoutTree::single(PaneId::new());
        for op in &ops {
            tree = apply(&tree, op);
            prop_assert!(tree.validate().is_ok(), "invalid tree after {:?}: {:?}", op, tree);
        }
    }

    /// Splitting adds exactly one pane; closing it again restores the tree.
    #[test]
    fn close_undoes_split(
        ops in proptest::collection::vec(layout_op_strategy(), 0..20),
        pick in 0usize..16,
        side in drop_side_strategy(),
    ) {
        let mut tree = LayoutTree::single(PaneId::new());
        for op in &ops {
            tree = apply(&tree, op);
        }
        let panes = tree.pane_ids();
        prop_assume!(!panes.is_empty());
        let target = panes[pick % panes.len()];
        let path = tree.find_path_by_id(target).unwrap();

        let fresh = PaneId::new();
        let split = tree.split(&path, side, fresh).unwrap();
        prop_assert_eq!(split.pane_count(), tree.pane_count() + 1);

        let fresh_path = split.find_path_by_id(fresh).unwrap();
        let closed = split.close(fresh, &fresh_path).unwrap();
        prop_assert_eq!(closed, tree);
    }

    /// Moving a node onto its own path returns an identical tree.
    #[test]
    fn self_move_is_noop(
        ops in proptest::collection::vec(layout_op_strategy(), 0..20),
        pick in 0usize..16,
        side in drop_side_strategy(),
    ) {
        let mut tree = LayoutTree::single(PaneId::new());
        for op in &ops {
            tree = apply(&tree, op);
        }
        let panes = tree.pane_ids();
        prop_assume!(!panes.is_empty());
        let path = tree.find_path_by_id(panes[pick % panes.len()]).unwrap();
        prop_assert_eq!(tree.move_node(&path, &path, side).unwrap(), tree);
    }

    /// Moving never adds or loses panes.
    #[test]
    fn move_preserves_pane_set(
        ops in proptest::collection::vec(layout_op_strategy(), 0..20),
        source in 0usize..16,
        target in 0usize..16,
        side in drop_side_strategy(),
    ) {
        let mut tree = LayoutTree::single(PaneId::new());
        for op in &ops {
            tree = apply(&tree, op);
        }
        let panes = tree.pane_ids();
        prop_assume!(!panes.is_empty());
        let source = tree.find_path_by_id(panes[source % panes.len()]).unwrap();
        let target = tree.find_path_by_id(panes[target % panes.len()]).unwrap();
        if let Ok(moved) = tree.move_node(&source, &target, side) {
            prop_assert_eq!(sorted(moved.pane_ids()), sorted(tree.pane_ids()));
        }
    }

    /// Resizing keeps both neighbours at or above the floor they started from.
    #[test]
    fn resize_respects_floor(delta in -200.0f64..200.0, first in 10.0f64..90.0) {
        let a = PaneId::new();
        let b = PaneId::new();
        let root = LayoutNode::split_with_sizes(
            panegrid_core::layout::SplitDirection::Horizontal,
            vec![LayoutNode::leaf(a), LayoutNode::leaf(b)],
            vec![first, 100.0 - first],
        );
        let tree = LayoutTree::try_from_root(root).unwrap();
        let resized = tree.resize(&[], 0, delta, DEFAULT_MIN_PANE_PERCENT).unwrap();

        let sizes = &resized.root().and_then(LayoutNode::as_split).unwrap().sizes;
        prop_assert!(sizes[0] >= DEFAULT_MIN_PANE_PERCENT - SIZE_EPSILON);
        prop_assert!(sizes[1] >= DEFAULT_MIN_PANE_PERCENT - SIZE_EPSILON);
        prop_assert!((sizes[0] + sizes[1] - 100.0).abs() < SIZE_EPSILON);
    }

    /// Failed operations never change the input snapshot.
    #[test]
    fn failed_split_leaves_tree_unchanged(ops in proptest::collection::vec(layout_op_strategy(), 0..20)) {
        let mut tree = LayoutTree::single(PaneId::new());
        for op in &ops {
            tree = apply(&tree, op);
        }
        let before = tree.clone();
        if let Some(existing) = tree.pane_ids().first().copied() {
            let path = tree.find_path_by_id(existing).unwrap();
            prop_assert!(tree.split(&path, DropSide::Left, existing).is_err());
        }
        prop_assert_eq!(tree, before);
    }

    /// Layouts survive a JSON round trip.
    #[test]
    fn json_roundtrip(ops in proptest::collection::vec(layout_op_strategy(), 0..20)) {
        let mut tree = LayoutTree::single(PaneId::new());
        for op in &ops {
            tree = apply(&tree, op);
        }
        let json = serde_json::to_string(&tree).unwrap();
        let parsed: LayoutTree = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed.pane_ids(), tree.pane_ids());
        prop_assert!(parsed.validate().is_ok());
    }
}
