//! Single-owner event loop for a workspace
//!
//! Transports and content loaders hold an [`EventSender`] and push
//! [`WorkspaceEvent`]s into one multiplexed channel. The
//! [`WorkspaceRuntime`] owns the workspace and is the only place events are
//! applied, so no locking is needed around the layout or the registry.
//!
//! # Example
//!
//! ```
//! use panegrid_core::runtime::WorkspaceRuntime;
//! use panegrid_core::registry::ContentRequest;
//! use panegrid_core::settings::WorkspaceSettings;
//! use panegrid_core::stream::RecordingTransport;
//! use panegrid_core::workspace::Workspace;
//!
//! let workspace = Workspace::new(RecordingTransport::new(), WorkspaceSettings::default());
//! let (mut runtime, sender) = WorkspaceRuntime::new(workspace);
//! let pane = runtime.workspace().active_pane().unwrap();
//!
//! runtime
//!     .workspace_mut()
//!     .load_content(pane, ContentRequest::chat("c"))
//!     .unwrap();
//! let stream = runtime.workspace_mut().send_message(pane, "hi").unwrap();
//!
//! sender.chunk(stream, "data: {\"choices\":[{\"delta\":{\"content\":\"Hello\"}}]}\n\n");
//! sender.complete(stream);
//! assert_eq!(runtime.process_pending(), 2);
//! assert!(!runtime.workspace().is_streaming());
//! ```

use tokio::sync::mpsc;

use crate::chat::Message;
use crate::layout::PaneId;
use crate::stream::{StreamId, Transport};
use crate::workspace::{Workspace, WorkspaceEvent};

/// Clonable handle for delivering events to a [`WorkspaceRuntime`].
///
/// Every `send*` method returns false once the runtime has been dropped.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<WorkspaceEvent>,
}

impl EventSender {
    /// Queues an event.
    pub fn send(&self, event: WorkspaceEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Queues raw wire data for a stream.
    pub fn chunk(&self, stream_id: StreamId, data: impl Into<String>) -> bool {
        self.send(WorkspaceEvent::Chunk {
            stream_id,
            data: data.into(),
        })
    }

    /// Queues normal completion of a stream.
    pub fn complete(&self, stream_id: StreamId) -> bool {
        self.send(WorkspaceEvent::Complete { stream_id })
    }

    /// Queues a stream failure.
    pub fn error(&self, stream_id: StreamId, error: impl Into<String>) -> bool {
        self.send(WorkspaceEvent::Error {
            stream_id,
            error: error.into(),
        })
    }

    /// Queues a user interrupt.
    pub fn interrupt(&self, stream_id: StreamId) -> bool {
        self.send(WorkspaceEvent::Interrupt { stream_id })
    }

    /// Queues a loaded chat transcript.
    pub fn content_loaded(
        &self,
        pane_id: PaneId,
        conversation_id: Option<String>,
        messages: Vec<Message>,
    ) -> bool {
        self.send(WorkspaceEvent::ContentLoaded {
            pane_id,
            conversation_id,
            messages,
        })
    }

    /// Returns true if the runtime has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Owns a workspace and applies queued events to it in arrival order.
pub struct WorkspaceRuntime<T: Transport> {
    workspace: Workspace<T>,
    events: mpsc::UnboundedReceiver<WorkspaceEvent>,
    handle: mpsc::WeakUnboundedSender<WorkspaceEvent>,
}

impl<T: Transport> WorkspaceRuntime<T> {
    /// Wraps a workspace and returns the first sender for it.
    ///
    /// The runtime keeps no strong sender of its own: [`Self::run`] ends
    /// once every [`EventSender`] has been dropped.
    #[must_use]
    pub fn new(workspace: Workspace<T>) -> (Self, EventSender) {
        let (tx, events) = mpsc::unbounded_channel();
        let runtime = Self {
            workspace,
            events,
            handle: tx.downgrade(),
        };
        (runtime, EventSender { tx })
    }

    /// Returns another sender, or `None` if all senders are gone.
    #[must_use]
    pub fn sender(&self) -> Option<EventSender> {
        self.handle.upgrade().map(|tx| EventSender { tx })
    }

    /// Returns the workspace.
    #[must_use]
    pub const fn workspace(&self) -> &Workspace<T> {
        &self.workspace
    }

    /// Returns the workspace mutably, for user actions between events.
    pub fn workspace_mut(&mut self) -> &mut Workspace<T> {
        &mut self.workspace
    }

    /// Consumes the runtime and returns the workspace.
    #[must_use]
    pub fn into_workspace(self) -> Workspace<T> {
        self.workspace
    }

    /// Applies every event already queued without waiting.
    ///
    /// Returns the number of events taken from the queue, including ones
    /// the workspace ignored.
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.events.try_recv() {
            self.apply(event);
            processed += 1;
        }
        processed
    }

    /// Waits for the next event and applies it.
    ///
    /// Returns `None` once every sender is dropped and the queue is empty,
    /// otherwise whether the event changed the workspace.
    pub async fn next_event(&mut self) -> Option<bool> {
        let event = self.events.recv().await?;
        Some(self.apply(event))
    }

    /// Applies events until every sender is dropped.
    ///
    /// Returns the number of events processed.
    pub async fn run(&mut self) -> usize {
        let mut processed = 0;
        while self.next_event().await.is_some() {
            processed += 1;
        }
        tracing::debug!(events = processed, "Workspace event loop finished");
        processed
    }

    fn apply(&mut self, event: WorkspaceEvent) -> bool {
        let stream_id = event.stream_id();
        let applied = self.workspace.handle_event(event);
        if !applied {
            tracing::trace!(stream_id = ?stream_id, "Event ignored");
        }
        applied
    }
}
