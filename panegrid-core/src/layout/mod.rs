//! Pane layout tree
//!
//! This module provides the recursive split tree that arranges the panes of
//! a workspace. The tree is an immutable value: split, close, move and resize
//! each return a new snapshot and leave the input untouched.
//!
//! # Module Structure
//!
//! - `types` - Identifier types and enums (`PaneId`, `SplitId`, `NodeId`, `SplitDirection`, `DropSide`)
//! - `tree` - Tree nodes and operations (`LayoutNode`, `SplitNode`, `LayoutTree`)
//! - `drop_zone` - Drag-and-drop side detection
//! - `error` - Error types (`LayoutError`)
//!
//! # Example
//!
//! ```
//! use panegrid_core::layout::{DropSide, LayoutTree, PaneId};
//!
//! let a = PaneId::new();
//! let b = PaneId::new();
//! let tree = LayoutTree::single(a);
//!
//! let split = tree.split(&[], DropSide::Right, b).unwrap();
//! assert_eq!(split.pane_ids(), vec![a, b]);
//!
//! let path = split.find_path_by_id(b).unwrap();
//! let closed = split.close(b, &path).unwrap();
//! assert_eq!(closed, tree);
//! ```

pub mod drop_zone;
mod error;
mod tree;
mod types;

pub use error::{LayoutError, LayoutResult};
pub use tree::{
    DEFAULT_MIN_PANE_PERCENT, DEFAULT_SPLIT_SIZES, LayoutNode, LayoutTree, LeafNode,
    SIZE_EPSILON, SplitNode,
};
pub use types::{DropSide, NodeId, PaneId, SplitDirection, SplitId};
