//! Events delivered to a workspace from outside

use crate::chat::Message;
use crate::layout::PaneId;
use crate::stream::StreamId;

/// An asynchronous result arriving at the workspace.
///
/// Stream events are keyed only by stream id. Events for streams that have
/// already ended are ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceEvent {
    /// Raw wire data for a stream
    Chunk {
        /// Stream the data belongs to
        stream_id: StreamId,
        /// Wire bytes, possibly containing partial records
        data: String,
    },
    /// The stream finished normally
    Complete {
        /// Finished stream
        stream_id: StreamId,
    },
    /// The stream failed
    Error {
        /// Failed stream
        stream_id: StreamId,
        /// Error text shown to the user
        error: String,
    },
    /// The user asked to stop the stream
    Interrupt {
        /// Stream to stop
        stream_id: StreamId,
    },
    /// A chat transcript finished loading
    ContentLoaded {
        /// Pane that requested the transcript
        pane_id: PaneId,
        /// Conversation the transcript belongs to
        conversation_id: Option<String>,
        /// Messages, oldest first
        messages: Vec<Message>,
    },
}

impl WorkspaceEvent {
    /// Returns the stream this event refers to, if any.
    #[must_use]
    pub const fn stream_id(&self) -> Option<StreamId> {
        match self {
            Self::Chunk { stream_id, .. }
            | Self::Complete { stream_id }
            | Self::Error { stream_id, .. }
            | Self::Interrupt { stream_id } => Some(*stream_id),
            Self::ContentLoaded { .. } => None,
        }
    }
}
