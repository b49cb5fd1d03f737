//! Layout tree structure for pane grids
//!
//! The workspace layout is an n-ary tree. Each node is either a leaf showing
//! exactly one pane or a split arranging two or more children along one
//! direction, with a percentage size per child.
//!
//! # Tree Structure
//!
//! ```text
//! Split(horizontal, [40, 60])
//! ├── Leaf(A)
//! └── Split(vertical, [50, 50])
//!     ├── Leaf(B)
//!     └── Leaf(C)
//! ```
//!
//! [`LayoutTree`] is a value: every operation borrows the current snapshot
//! and returns a new one, leaving the input untouched. Operations that fail
//! return a [`LayoutError`] and produce no partial result. Nodes are
//! addressed either by index path (valid for one snapshot only) or by id
//! (stable across snapshots).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{LayoutError, LayoutResult};
use super::types::{DropSide, NodeId, PaneId, SplitDirection, SplitId};

/// Sizes given to the two children of a freshly created split.
pub const DEFAULT_SPLIT_SIZES: [f64; 2] = [50.0, 50.0];

/// Smallest share (in percent) a resize may leave to a child.
pub const DEFAULT_MIN_PANE_PERCENT: f64 = 10.0;

/// Tolerance for the "sizes sum to 100" invariant.
pub const SIZE_EPSILON: f64 = 1e-6;

/// A node in the layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayoutNode {
    /// A leaf showing one pane.
    Leaf(LeafNode),
    /// A split containing two or more child nodes.
    Split(SplitNode),
}

/// A leaf node. Its id is the id of the pane it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafNode {
    /// Pane shown in this slot.
    pub id: PaneId,
}

/// A split node arranging children along one direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitNode {
    /// Unique identifier for this split.
    pub id: SplitId,
    /// Layout direction of the children.
    pub direction: SplitDirection,
    /// Ordered children (left to right, or top to bottom).
    pub children: Vec<LayoutNode>,
    /// Percentage of space per child, same length as `children`.
    pub sizes: Vec<f64>,
}

impl SplitNode {
    /// Creates a split with equal sizes for all children.
    #[must_use]
    pub fn new(direction: SplitDirection, children: Vec<LayoutNode>) -> Self {
        let sizes = equal_sizes(children.len());
        Self {
            id: SplitId::new(),
            direction,
            children,
            sizes,
        }
    }

    /// Creates a split with explicit sizes.
    ///
    /// The sizes are not checked here; [`LayoutTree::validate`] reports
    /// trees built with inconsistent sizes.
    #[must_use]
    pub fn with_sizes(direction: SplitDirection, children: Vec<LayoutNode>, sizes: Vec<f64>) -> Self {
        Self {
            id: SplitId::new(),
            direction,
            children,
            sizes,
        }
    }

    /// Gives every child the same share.
    fn equalize(&mut self) {
        self.sizes = equal_sizes(self.children.len());
    }
}

/// Returns `count` equal percentages summing to 100.
fn equal_sizes(count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    vec![100.0 / count as f64; count]
}

impl LayoutNode {
    /// Creates a leaf node for a pane.
    #[must_use]
    pub const fn leaf(id: PaneId) -> Self {
        Self::Leaf(LeafNode { id })
    }

    /// Creates a split node with equal child sizes.
    #[must_use]
    pub fn split(direction: SplitDirection, children: Vec<Self>) -> Self {
        Self::Split(SplitNode::new(direction, children))
    }

    /// Creates a split node with explicit child sizes.
    #[must_use]
    pub fn split_with_sizes(direction: SplitDirection, children: Vec<Self>, sizes: Vec<f64>) -> Self {
        Self::Split(SplitNode::with_sizes(direction, children, sizes))
    }

    /// Returns the id of this node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            Self::Leaf(leaf) => NodeId::Pane(leaf.id),
            Self::Split(split) => NodeId::Split(split.id),
        }
    }

    /// Returns true if this is a leaf node.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Returns true if this is a split node.
    #[must_use]
    pub const fn is_split(&self) -> bool {
        matches!(self, Self::Split(_))
    }

    /// Returns the leaf if this is a leaf node.
    #[must_use]
    pub const fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Split(_) => None,
        }
    }

    /// Returns the split if this is a split node.
    #[must_use]
    pub const fn as_split(&self) -> Option<&SplitNode> {
        match self {
            Self::Leaf(_) => None,
            Self::Split(split) => Some(split),
        }
    }

    // ========================================================================
    // Tree Traversal Methods
    // ========================================================================

    /// Walks child indices from this node.
    ///
    /// Returns `None` if an index is out of range or a leaf is indexed into.
    /// An empty path returns this node.
    #[must_use]
    pub fn find_node_by_path(&self, path: &[usize]) -> Option<&Self> {
        let mut node = self;
        for &index in path {
            node = match node {
                Self::Leaf(_) => return None,
                Self::Split(split) => split.children.get(index)?,
            };
        }
        Some(node)
    }

    /// Finds the index path of the node with the given id.
    ///
    /// Searches depth-first in child order and returns the first match.
    #[must_use]
    pub fn find_path_by_id(&self, id: NodeId) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        if self.search_path(id, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    fn search_path(&self, id: NodeId, path: &mut Vec<usize>) -> bool {
        if self.id() == id {
            return true;
        }
        if let Self::Split(split) = self {
            for (index, child) in split.children.iter().enumerate() {
                path.push(index);
                if child.search_path(id, path) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }

    /// Returns all pane IDs in the tree.
    ///
    /// Traverses the tree in pre-order (depth-first, in child order).
    #[must_use]
    pub fn pane_ids(&self) -> Vec<PaneId> {
        let mut ids = Vec::new();
        self.collect_pane_ids(&mut ids);
        ids
    }

    fn collect_pane_ids(&self, ids: &mut Vec<PaneId>) {
        match self {
            Self::Leaf(leaf) => ids.push(leaf.id),
            Self::Split(split) => {
                for child in &split.children {
                    child.collect_pane_ids(ids);
                }
            }
        }
    }

    /// Returns the depth of the tree.
    ///
    /// A single leaf has depth 0. Each level of splits adds 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Split(split) => {
                1 + split
                    .children
                    .iter()
                    .map(Self::depth)
                    .max()
                    .unwrap_or_default()
            }
        }
    }

    /// Returns the number of leaf panes in the tree.
    #[must_use]
    pub fn pane_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Split(split) => split.children.iter().map(Self::pane_count).sum(),
        }
    }

    /// Returns true if the tree contains a leaf for the given pane.
    #[must_use]
    pub fn contains_pane(&self, pane: PaneId) -> bool {
        self.find_path_by_id(NodeId::Pane(pane)).is_some()
    }

    fn find_node_by_path_mut(&mut self, path: &[usize]) -> Option<&mut Self> {
        let mut node = self;
        for &index in path {
            node = match node {
                Self::Leaf(_) => return None,
                Self::Split(split) => split.children.get_mut(index)?,
            };
        }
        Some(node)
    }
}

// ============================================================================
// Structural helpers
// ============================================================================

/// Replaces `slot` with a new split holding `inserted` and the old node.
///
/// Children are ordered `[inserted, old]` for left/top and `[old, inserted]`
/// for right/bottom.
fn wrap_in_split(slot: &mut LayoutNode, inserted: LayoutNode, side: DropSide) {
    let placeholder = LayoutNode::leaf(PaneId::from_uuid(Uuid::nil()));
    let existing = std::mem::replace(slot, placeholder);
    let children = if side.inserts_first() {
        vec![inserted, existing]
    } else {
        vec![existing, inserted]
    };
    *slot = LayoutNode::Split(SplitNode::with_sizes(
        side.direction(),
        children,
        DEFAULT_SPLIT_SIZES.to_vec(),
    ));
}

/// Removes the node at a non-empty `path` from its parent split.
///
/// A parent that keeps two or more children has its sizes redistributed
/// equally. A parent left with one or zero children is left as is; the
/// [`collapse`] pass cleans it up.
fn remove_at_path(root: &mut LayoutNode, path: &[usize]) -> Option<LayoutNode> {
    let (&index, parent_path) = path.split_last()?;
    let LayoutNode::Split(parent) = root.find_node_by_path_mut(parent_path)? else {
        return None;
    };
    if index >= parent.children.len() {
        return None;
    }
    let removed = parent.children.remove(index);
    if index < parent.sizes.len() {
        parent.sizes.remove(index);
    }
    if parent.children.len() >= 2 {
        parent.equalize();
    }
    Some(removed)
}

/// Removes empty splits and replaces single-child splits by their child.
///
/// Applied bottom-up, so a collapse that leaves an ancestor with one child
/// cascades upward. Splits that still hold two or more children keep their
/// sizes unless one of their children disappeared entirely.
fn collapse(node: LayoutNode) -> Option<LayoutNode> {
    match node {
        LayoutNode::Leaf(_) => Some(node),
        LayoutNode::Split(mut split) => {
            let before = split.children.len();
            let children: Vec<LayoutNode> = std::mem::take(&mut split.children)
                .into_iter()
                .filter_map(collapse)
                .collect();
            let dropped = children.len() != before;
            split.children = children;
            match split.children.len() {
                0 => None,
                1 => split.children.pop(),
                _ => {
                    if dropped || split.sizes.len() != split.children.len() {
                        split.equalize();
                    }
                    Some(LayoutNode::Split(split))
                }
            }
        }
    }
}

// ============================================================================
// Layout tree snapshot
// ============================================================================

/// An immutable snapshot of the workspace layout.
///
/// `root == None` is the explicit empty-workspace state reached by closing
/// the last pane.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutTree {
    root: Option<LayoutNode>,
}

impl LayoutTree {
    /// Creates an empty layout with no panes.
    #[must_use]
    pub const fn empty() -> Self {
        Self { root: None }
    }

    /// Creates a layout holding a single pane.
    #[must_use]
    pub const fn single(pane: PaneId) -> Self {
        Self {
            root: Some(LayoutNode::leaf(pane)),
        }
    }

    /// Wraps an existing node without checking invariants.
    #[must_use]
    pub const fn from_root(root: LayoutNode) -> Self {
        Self { root: Some(root) }
    }

    /// Wraps an existing node after checking every invariant.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found by [`Self::validate`].
    pub fn try_from_root(root: LayoutNode) -> LayoutResult<Self> {
        let tree = Self::from_root(root);
        tree.validate()?;
        Ok(tree)
    }

    /// Returns the root node, or `None` for an empty workspace.
    #[must_use]
    pub const fn root(&self) -> Option<&LayoutNode> {
        self.root.as_ref()
    }

    /// Returns true if the workspace has no panes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns all pane ids in visual (pre-order) order.
    #[must_use]
    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.root.as_ref().map(LayoutNode::pane_ids).unwrap_or_default()
    }

    /// Returns the number of panes.
    #[must_use]
    pub fn pane_count(&self) -> usize {
        self.root.as_ref().map_or(0, LayoutNode::pane_count)
    }

    /// Returns the depth of the tree (0 for a single pane or empty layout).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, LayoutNode::depth)
    }

    /// Returns true if the layout contains the pane.
    #[must_use]
    pub fn contains_pane(&self, pane: PaneId) -> bool {
        self.root
            .as_ref()
            .is_some_and(|root| root.contains_pane(pane))
    }

    /// Resolves an index path against this snapshot.
    #[must_use]
    pub fn find_node_by_path(&self, path: &[usize]) -> Option<&LayoutNode> {
        self.root.as_ref()?.find_node_by_path(path)
    }

    /// Finds the current index path of a node by id.
    #[must_use]
    pub fn find_path_by_id(&self, id: impl Into<NodeId>) -> Option<Vec<usize>> {
        self.root.as_ref()?.find_path_by_id(id.into())
    }

    /// Splits the leaf at `target_path`, inserting `new_pane` on `side`.
    ///
    /// The target leaf is wrapped in a new split whose direction follows the
    /// side (left/right → horizontal, top/bottom → vertical) with sizes
    /// `[50, 50]`. With an empty path and a leaf root, the new split becomes
    /// the root.
    ///
    /// # Errors
    ///
    /// - `LayoutError::EmptyWorkspace` if there is no pane to split
    /// - `LayoutError::InvalidPath` if the path does not resolve to a leaf
    /// - `LayoutError::DuplicatePane` if `new_pane` is already in the tree
    pub fn split(&self, target_path: &[usize], side: DropSide, new_pane: PaneId) -> LayoutResult<Self> {
        let current = self.root.as_ref().ok_or(LayoutError::EmptyWorkspace)?;
        if current.contains_pane(new_pane) {
            return Err(LayoutError::DuplicatePane(new_pane));
        }
        match current.find_node_by_path(target_path) {
            Some(LayoutNode::Leaf(_)) => {}
            _ => return Err(LayoutError::InvalidPath(target_path.to_vec())),
        }

        let mut root = current.clone();
        let slot = root
            .find_node_by_path_mut(target_path)
            .ok_or_else(|| LayoutError::InvalidPath(target_path.to_vec()))?;
        wrap_in_split(slot, LayoutNode::leaf(new_pane), side);

        let tree = Self::from_root(root);
        debug_assert!(tree.validate().is_ok());
        Ok(tree)
    }

    /// Removes a pane's leaf from the layout.
    ///
    /// `path` is the caller's view of where the pane sits. If it no longer
    /// points at that pane (the tree changed underneath the caller), the pane
    /// is located by id instead.
    ///
    /// A parent split left with one child is replaced by that child; one that
    /// keeps two or more children has its sizes redistributed equally.
    /// Closing the root leaf yields the empty layout.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::UnknownPane` if the pane is not in the layout.
    pub fn close(&self, pane: PaneId, path: &[usize]) -> LayoutResult<Self> {
        let current = self.root.as_ref().ok_or(LayoutError::UnknownPane(pane))?;
        let path = match current.find_node_by_path(path) {
            Some(LayoutNode::Leaf(leaf)) if leaf.id == pane => path.to_vec(),
            _ => current
                .find_path_by_id(NodeId::Pane(pane))
                .ok_or(LayoutError::UnknownPane(pane))?,
        };

        if path.is_empty() {
            return Ok(Self::empty());
        }

        let mut root = current.clone();
        remove_at_path(&mut root, &path).ok_or_else(|| LayoutError::InvalidPath(path.clone()))?;
        let tree = Self { root: collapse(root) };
        debug_assert!(tree.validate().is_ok());
        Ok(tree)
    }

    /// Moves the subtree at `source_path` next to the node at `target_path`.
    ///
    /// The source is detached first and the residual tree collapsed exactly
    /// as [`Self::close`] does. The target is then located again by id in the
    /// residual tree, because detaching shifts index paths, and the source is
    /// re-inserted with the same wrapping as [`Self::split`].
    ///
    /// Moving a node onto itself is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::InvalidPath` if either path does not resolve,
    /// the source is the root, or the target lies inside the source.
    pub fn move_node(&self, source_path: &[usize], target_path: &[usize], side: DropSide) -> LayoutResult<Self> {
        if source_path == target_path {
            return Ok(self.clone());
        }
        let current = self
            .root
            .as_ref()
            .ok_or_else(|| LayoutError::InvalidPath(source_path.to_vec()))?;
        if source_path.is_empty() || current.find_node_by_path(source_path).is_none() {
            return Err(LayoutError::InvalidPath(source_path.to_vec()));
        }
        let target_id = current
            .find_node_by_path(target_path)
            .map(LayoutNode::id)
            .ok_or_else(|| LayoutError::InvalidPath(target_path.to_vec()))?;
        if target_path.starts_with(source_path) {
            return Err(LayoutError::InvalidPath(target_path.to_vec()));
        }

        let mut residual = current.clone();
        let detached = remove_at_path(&mut residual, source_path)
            .ok_or_else(|| LayoutError::InvalidPath(source_path.to_vec()))?;
        let mut residual =
            collapse(residual).ok_or_else(|| LayoutError::InvalidPath(source_path.to_vec()))?;

        // A target that was the source's parent may have collapsed away; its
        // slot is then held by the surviving sibling at the same path.
        let resolved = residual
            .find_path_by_id(target_id)
            .or_else(|| source_path.starts_with(target_path).then(|| target_path.to_vec()))
            .ok_or_else(|| LayoutError::InvalidPath(target_path.to_vec()))?;
        let slot = residual
            .find_node_by_path_mut(&resolved)
            .ok_or_else(|| LayoutError::InvalidPath(resolved.clone()))?;
        wrap_in_split(slot, detached, side);

        let tree = Self::from_root(residual);
        debug_assert!(tree.validate().is_ok());
        Ok(tree)
    }

    /// Moves the divider between `child_index` and `child_index + 1`.
    ///
    /// `sizes[child_index]` grows by `delta` and `sizes[child_index + 1]`
    /// shrinks by the same amount. The delta is clamped so neither child
    /// drops below `min_percent`; all other siblings are untouched.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::InvalidPath` if `split_path` is not a split or
    /// `child_index + 1` is out of range.
    pub fn resize(
        &self,
        split_path: &[usize],
        child_index: usize,
        delta: f64,
        min_percent: f64,
    ) -> LayoutResult<Self> {
        let mut root = self
            .root
            .clone()
            .ok_or_else(|| LayoutError::InvalidPath(split_path.to_vec()))?;
        let Some(LayoutNode::Split(split)) = root.find_node_by_path_mut(split_path) else {
            return Err(LayoutError::InvalidPath(split_path.to_vec()));
        };
        let Some(next_index) = child_index
            .checked_add(1)
            .filter(|next| *next < split.sizes.len())
        else {
            let mut path = split_path.to_vec();
            path.push(child_index);
            return Err(LayoutError::InvalidPath(path));
        };
        if !delta.is_finite() {
            return Ok(self.clone());
        }

        let first = split.sizes[child_index];
        let second = split.sizes[next_index];
        let lower = -(first - min_percent).max(0.0);
        let upper = (second - min_percent).max(0.0);
        let applied = delta.clamp(lower, upper);
        split.sizes[child_index] = first + applied;
        split.sizes[next_index] = second - applied;

        Ok(Self::from_root(root))
    }

    /// Checks every structural invariant of the layout.
    ///
    /// # Errors
    ///
    /// - `LayoutError::SizeInvariantViolation` if a split has fewer than two
    ///   children, a sizes/children length mismatch, a negative or non-finite
    ///   size, or sizes not summing to 100
    /// - `LayoutError::DuplicatePane` if a pane id appears twice
    pub fn validate(&self) -> LayoutResult<()> {
        let Some(root) = &self.root else {
            return Ok(());
        };
        let mut seen = HashSet::new();
        validate_node(root, &mut seen)
    }
}

fn validate_node(node: &LayoutNode, seen: &mut HashSet<NodeId>) -> LayoutResult<()> {
    match node {
        LayoutNode::Leaf(leaf) => {
            if !seen.insert(NodeId::Pane(leaf.id)) {
                return Err(LayoutError::DuplicatePane(leaf.id));
            }
            Ok(())
        }
        LayoutNode::Split(split) => {
            let violation = |reason: String| LayoutError::SizeInvariantViolation {
                split: split.id,
                reason,
            };
            if !seen.insert(NodeId::Split(split.id)) {
                return Err(violation("split id appears twice".to_string()));
            }
            if split.children.len() < 2 {
                return Err(violation(format!(
                    "split has {} children, expected at least 2",
                    split.children.len()
                )));
            }
            if split.sizes.len() != split.children.len() {
                return Err(violation(format!(
                    "{} sizes for {} children",
                    split.sizes.len(),
                    split.children.len()
                )));
            }
            if split.sizes.iter().any(|size| !size.is_finite() || *size < 0.0) {
                return Err(violation(format!("invalid size in {:?}", split.sizes)));
            }
            let sum: f64 = split.sizes.iter().sum();
            if (sum - 100.0).abs() > SIZE_EPSILON {
                return Err(violation(format!("sizes sum to {sum}")));
            }
            for child in &split.children {
                validate_node(child, seen)?;
            }
            Ok(())
        }
    }
}
