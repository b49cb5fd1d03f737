//! Error types for layout tree operations
//!
//! Every layout operation is all-or-nothing: when it returns one of these
//! errors the caller still holds the untouched input tree.

use super::types::{PaneId, SplitId};

/// Errors that can occur during layout tree operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// The path does not resolve to a suitable node in the current tree.
    #[error("invalid layout path: {0:?}")]
    InvalidPath(Vec<usize>),

    /// The pane is not part of the current tree.
    #[error("unknown pane: {0}")]
    UnknownPane(PaneId),

    /// A pane id is already present in the tree.
    #[error("pane already present in layout: {0}")]
    DuplicatePane(PaneId),

    /// The workspace has no panes.
    #[error("the workspace is empty")]
    EmptyWorkspace,

    /// A split node breaks the sizes invariant.
    ///
    /// Only reachable through hand-built or deserialized trees; the layout
    /// operations themselves never produce it.
    #[error("split {split} violates size invariant: {reason}")]
    SizeInvariantViolation {
        /// The offending split.
        split: SplitId,
        /// Human-readable description of the violation.
        reason: String,
    },
}

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;
