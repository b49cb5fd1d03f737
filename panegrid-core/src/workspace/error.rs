//! Error types for workspace actions

use crate::layout::{LayoutError, PaneId, SplitId};
use crate::persistence::SnapshotError;
use crate::registry::RegistryError;

/// Errors returned by workspace actions.
///
/// Layout and registry failures leave the workspace unchanged.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    /// A layout operation failed
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// A content operation failed
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The pane is not part of the workspace
    #[error("pane not in workspace: {0}")]
    UnknownPane(PaneId),

    /// The split is not part of the workspace
    #[error("split not in workspace: {0}")]
    UnknownSplit(SplitId),

    /// Saving or loading a snapshot failed
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Result type for workspace actions.
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
