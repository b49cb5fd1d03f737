//! Crate-wide error type
//!
//! Each module has its own error enum; `PaneGridError` wraps them for
//! callers that drive several modules at once, such as the CLI.

use std::io;

use crate::layout::LayoutError;
use crate::persistence::SnapshotError;
use crate::registry::RegistryError;
use crate::settings::SettingsError;
use crate::stream::{FrameError, TransportError};
use crate::tracing::TracingError;
use crate::workspace::WorkspaceError;

/// Top-level error for the pane grid core.
#[derive(Debug, thiserror::Error)]
pub enum PaneGridError {
    /// Layout tree operation failed
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Pane registry operation failed
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Wire data could not be decoded
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// Transport refused a request
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Snapshot could not be saved or loaded
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Settings could not be read or written
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Logging setup failed
    #[error("Tracing error: {0}")]
    Tracing(#[from] TracingError),

    /// Workspace action failed
    #[error("Workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type using [`PaneGridError`].
pub type Result<T> = std::result::Result<T, PaneGridError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PaneId;

    #[test]
    fn wraps_layout_error() {
        let err: PaneGridError = LayoutError::EmptyWorkspace.into();
        assert!(err.to_string().starts_with("Layout error"));
    }

    #[test]
    fn wraps_workspace_error_transparently() {
        let pane = PaneId::new();
        let err: PaneGridError = WorkspaceError::from(RegistryError::NotAChatPane(pane)).into();
        let msg = err.to_string();
        assert!(msg.starts_with("Workspace error"));
        assert!(msg.contains(&pane.to_string()));
    }

    #[test]
    fn wraps_io_error() {
        let err: PaneGridError = io::Error::other("disk full").into();
        assert!(err.to_string().contains("disk full"));
    }
}
