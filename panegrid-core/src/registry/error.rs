//! Error types for registry operations

use crate::chat::MessageId;
use crate::layout::PaneId;

/// Errors that can occur when accessing pane content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No entry exists for the pane.
    #[error("no content registered for {0}")]
    UnknownPane(PaneId),

    /// The pane does not show a chat.
    #[error("{0} is not a chat pane")]
    NotAChatPane(PaneId),

    /// The message is not part of the pane's transcript.
    #[error("unknown message: {0}")]
    UnknownMessage(MessageId),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
