//! Transport abstraction for opening and cancelling streams
//!
//! The transport does the network work outside this crate. Opening a stream
//! returns immediately; chunks, completion and errors come back later as
//! [`crate::runtime::WorkspaceEvent`]s tagged with the stream id.

use super::types::StreamId;
use crate::layout::PaneId;

/// Errors reported by a transport
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The transport cannot currently reach its backend
    #[error("transport unavailable: {0}")]
    Unavailable(String),
    /// The backend refused the request
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Request to start streaming a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRequest {
    /// Id that every event of this stream must carry
    pub stream_id: StreamId,
    /// Pane the response is destined for
    pub pane_id: PaneId,
    /// Conversation the pane is showing, if any
    pub conversation_id: Option<String>,
    /// User message text
    pub content: String,
}

/// Opens and cancels response streams.
///
/// Both calls must return without waiting for the remote side.
pub trait Transport {
    /// Starts a stream for `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream could not be started at all.
    fn open_stream(&mut self, request: StreamRequest) -> Result<(), TransportError>;

    /// Asks the remote side to stop a stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the cancel request could not be delivered.
    fn cancel(&mut self, stream_id: StreamId) -> Result<(), TransportError>;
}

/// Transport that records requests instead of sending them.
///
/// Useful for replaying scripted sessions, where the script supplies the
/// stream events itself.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    /// Requests passed to `open_stream`, in order
    pub opened: Vec<StreamRequest>,
    /// Streams passed to `cancel`, in order
    pub cancelled: Vec<StreamId>,
    /// When set, `open_stream` fails with this error
    pub fail_open: Option<TransportError>,
    /// When set, `cancel` fails with this error
    pub fail_cancel: Option<TransportError>,
}

impl RecordingTransport {
    /// Creates a transport that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for RecordingTransport {
    fn open_stream(&mut self, request: StreamRequest) -> Result<(), TransportError> {
        if let Some(err) = &self.fail_open {
            return Err(err.clone());
        }
        self.opened.push(request);
        Ok(())
    }

    fn cancel(&mut self, stream_id: StreamId) -> Result<(), TransportError> {
        self.cancelled.push(stream_id);
        match &self.fail_cancel {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
