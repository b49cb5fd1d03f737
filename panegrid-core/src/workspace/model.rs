//! Workspace coordinator
//!
//! `Workspace` owns the layout tree, the pane registry, the stream router
//! and the transport, and keeps them consistent: every layout change swaps
//! in a new tree and then syncs the registry with it.
//!
//! # Example
//!
//! ```
//! use panegrid_core::layout::DropSide;
//! use panegrid_core::registry::ContentRequest;
//! use panegrid_core::stream::RecordingTransport;
//! use panegrid_core::settings::WorkspaceSettings;
//! use panegrid_core::workspace::Workspace;
//!
//! let mut workspace = Workspace::new(RecordingTransport::new(), WorkspaceSettings::default());
//! let first = workspace.active_pane().unwrap();
//!
//! let second = workspace.split_pane(first, DropSide::Right).unwrap();
//! assert_eq!(workspace.layout().pane_ids(), vec![first, second]);
//!
//! workspace.load_content(second, ContentRequest::chat("conversation")).unwrap();
//! let stream = workspace.send_message(second, "hello").unwrap();
//! assert!(workspace.is_streaming());
//!
//! workspace.close_pane(second).unwrap();
//! assert!(!workspace.is_streaming());
//! assert_eq!(workspace.transport().cancelled, vec![stream]);
//! assert_eq!(workspace.active_pane(), Some(first));
//! ```

use std::collections::HashSet;

use super::error::{WorkspaceError, WorkspaceResult};
use super::event::WorkspaceEvent;
use crate::chat::{Message, MessageId};
use crate::layout::{DropSide, LayoutTree, NodeId, PaneId, drop_zone};
use crate::persistence::{PaneSummary, SnapshotResult, WorkspaceSnapshot, WorkspaceStore};
use crate::registry::{ContentRequest, ContentType, PaneRegistry, RegistryError};
use crate::settings::WorkspaceSettings;
use crate::stream::{StreamId, StreamRouter, Transport};
use crate::trace_operation;
use crate::tracing::span_names;

/// The state behind one workspace window.
pub struct Workspace<T: Transport> {
    layout: LayoutTree,
    registry: PaneRegistry,
    router: StreamRouter,
    active_pane: Option<PaneId>,
    transport: T,
    settings: WorkspaceSettings,
    store: Option<Box<dyn WorkspaceStore>>,
}

impl<T: Transport> Workspace<T> {
    /// Creates a workspace with one empty, focused pane.
    #[must_use]
    pub fn new(transport: T, settings: WorkspaceSettings) -> Self {
        let pane = PaneId::new();
        let layout = LayoutTree::single(pane);
        let mut registry = PaneRegistry::new();
        registry.sync(&layout);
        Self {
            layout,
            registry,
            router: StreamRouter::new(settings.stream.clone()),
            active_pane: Some(pane),
            transport,
            settings,
            store: None,
        }
    }

    /// Attaches a store used for autosave after layout changes.
    #[must_use]
    pub fn with_store(mut self, store: Box<dyn WorkspaceStore>) -> Self {
        self.store = Some(store);
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns the current layout snapshot.
    #[must_use]
    pub const fn layout(&self) -> &LayoutTree {
        &self.layout
    }

    /// Returns the pane registry.
    #[must_use]
    pub const fn registry(&self) -> &PaneRegistry {
        &self.registry
    }

    /// Returns the stream router.
    #[must_use]
    pub const fn router(&self) -> &StreamRouter {
        &self.router
    }

    /// Returns the focused pane, `None` only for an empty workspace.
    #[must_use]
    pub const fn active_pane(&self) -> Option<PaneId> {
        self.active_pane
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the transport mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Returns the settings.
    #[must_use]
    pub const fn settings(&self) -> &WorkspaceSettings {
        &self.settings
    }

    /// Returns true while any response is streaming.
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.router.is_streaming()
    }

    fn path_of(&self, id: impl Into<NodeId>) -> WorkspaceResult<Vec<usize>> {
        let id = id.into();
        self.layout.find_path_by_id(id).ok_or(match id {
            NodeId::Pane(pane) => WorkspaceError::UnknownPane(pane),
            NodeId::Split(split) => WorkspaceError::UnknownSplit(split),
        })
    }

    /// Installs a new layout and brings the registry in line with it.
    fn commit(&mut self, layout: LayoutTree) {
        self.layout = layout;
        {
            let _span = trace_operation!(span_names::REGISTRY_SYNC).entered();
            let report = self.registry.sync(&self.layout);
            if !report.is_noop() {
                tracing::debug!(
                    created = report.created.len(),
                    removed = report.removed.len(),
                    "Registry synced"
                );
            }
        }
        if self
            .active_pane
            .is_none_or(|active| !self.registry.contains(active))
        {
            self.active_pane = self.registry.most_recent();
        }
        self.autosave();
    }

    fn autosave(&mut self) {
        if !self.settings.persistence.autosave {
            return;
        }
        let snapshot = self.snapshot();
        if let Some(store) = self.store.as_mut()
            && let Err(err) = store.save(&snapshot)
        {
            tracing::warn!(error = %err, "Failed to autosave workspace");
        }
    }

    // ========================================================================
    // Layout actions
    // ========================================================================

    /// Opens a new pane next to the focused one and focuses it.
    ///
    /// In an empty workspace the new pane becomes the only pane.
    ///
    /// # Errors
    ///
    /// Returns a layout error if the split fails.
    pub fn new_pane(&mut self, side: DropSide) -> WorkspaceResult<PaneId> {
        match self.active_pane {
            Some(active) => self.split_pane(active, side),
            None => {
                let pane = PaneId::new();
                self.commit(LayoutTree::single(pane));
                self.active_pane = Some(pane);
                Ok(pane)
            }
        }
    }

    /// Splits `target`, placing a new empty pane on `side`, and focuses it.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::UnknownPane` if `target` is not in the
    /// layout.
    pub fn split_pane(&mut self, target: PaneId, side: DropSide) -> WorkspaceResult<PaneId> {
        let pane = PaneId::new();
        let _span = trace_operation!(span_names::LAYOUT_SPLIT, pane_id = %target, side = %side).entered();
        let path = self.path_of(target)?;
        let layout = self.layout.split(&path, side, pane)?;
        self.commit(layout);
        self.active_pane = Some(pane);
        tracing::debug!(new_pane = %pane, "Pane split");
        Ok(pane)
    }

    /// Closes a pane.
    ///
    /// Streams targeting the pane are interrupted first. If the pane was
    /// focused, the most recently created remaining pane gets focus.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::UnknownPane` if the pane is not in the
    /// layout.
    pub fn close_pane(&mut self, pane: PaneId) -> WorkspaceResult<()> {
        let _span = trace_operation!(span_names::LAYOUT_CLOSE, pane_id = %pane).entered();
        let path = self.path_of(pane)?;
        let layout = self.layout.close(pane, &path)?;

        let retired = self
            .router
            .retire_pane(&mut self.registry, &mut self.transport, pane);
        if !retired.is_empty() {
            tracing::debug!(streams = retired.len(), "Interrupted streams of closed pane");
        }

        self.commit(layout);
        Ok(())
    }

    /// Moves a pane or split next to another node.
    ///
    /// # Errors
    ///
    /// Returns an error if either node is not in the layout or the target
    /// lies inside the source.
    pub fn move_node(
        &mut self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        side: DropSide,
    ) -> WorkspaceResult<()> {
        let source = source.into();
        let target = target.into();
        let _span = trace_operation!(span_names::LAYOUT_MOVE, source = %source, target = %target, side = %side).entered();
        let source_path = self.path_of(source)?;
        let target_path = self.path_of(target)?;
        let layout = self.layout.move_node(&source_path, &target_path, side)?;
        self.commit(layout);
        Ok(())
    }

    /// Drops a dragged pane onto another pane at a pointer position.
    ///
    /// The side is picked from the point within the target's `width` x
    /// `height` rectangle. Returns `Ok(false)` if the point is outside the
    /// target or the pane is dropped onto itself.
    ///
    /// # Errors
    ///
    /// Same as [`Self::move_node`].
    pub fn drop_pane(
        &mut self,
        source: PaneId,
        target: PaneId,
        point: (f64, f64),
        size: (f64, f64),
    ) -> WorkspaceResult<bool> {
        let Some(side) = drop_zone::side_for_point(point.0, point.1, size.0, size.1) else {
            return Ok(false);
        };
        if source == target {
            return Ok(false);
        }
        self.move_node(source, target, side)?;
        Ok(true)
    }

    /// Moves the divider after `child_index` in the split at `split_path`.
    ///
    /// The floor comes from `layout.min_pane_percent`.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::InvalidPath` if the path is not a split or the
    /// index has no right neighbour.
    pub fn resize(&mut self, split_path: &[usize], child_index: usize, delta: f64) -> WorkspaceResult<()> {
        let _span = trace_operation!(span_names::LAYOUT_RESIZE, path = ?split_path, child_index, delta).entered();
        let floor = self.settings.layout.effective_min_pane_percent();
        let layout = self.layout.resize(split_path, child_index, delta, floor)?;
        self.commit(layout);
        Ok(())
    }

    /// Focuses a pane.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::UnknownPane` if the pane is not in the
    /// layout.
    pub fn focus(&mut self, pane: PaneId) -> WorkspaceResult<()> {
        if !self.layout.contains_pane(pane) {
            return Err(WorkspaceError::UnknownPane(pane));
        }
        self.active_pane = Some(pane);
        Ok(())
    }

    // ========================================================================
    // Content actions
    // ========================================================================

    /// Points a pane at new content.
    ///
    /// Streams still writing into the pane's old transcript are interrupted.
    /// For chat content the transcript arrives later as
    /// [`WorkspaceEvent::ContentLoaded`].
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownPane` if the pane has no entry.
    pub fn load_content(&mut self, pane: PaneId, request: ContentRequest) -> WorkspaceResult<()> {
        if !self.registry.contains(pane) {
            return Err(RegistryError::UnknownPane(pane).into());
        }
        self.router
            .retire_pane(&mut self.registry, &mut self.transport, pane);
        let window = self.settings.chat.effective_window_size();
        let content_type = request.content_type;
        self.registry.load(pane, request, window)?;
        tracing::debug!(pane_id = %pane, content_type = %content_type, "Content loaded");
        self.autosave();
        Ok(())
    }

    /// Sends a message from a chat pane and starts streaming the reply.
    ///
    /// # Errors
    ///
    /// Returns a registry error if the pane is unknown or not a chat pane.
    pub fn send_message(&mut self, pane: PaneId, content: &str) -> WorkspaceResult<StreamId> {
        Ok(self
            .router
            .send(&mut self.registry, &mut self.transport, pane, content)?)
    }

    /// Stops a stream. Returns false if it had already ended.
    pub fn interrupt(&mut self, stream_id: StreamId) -> bool {
        self.router
            .interrupt(&mut self.registry, &mut self.transport, stream_id)
    }

    /// Reveals older messages in a chat pane.
    ///
    /// Returns the number of newly visible messages.
    ///
    /// # Errors
    ///
    /// Returns a registry error if the pane is unknown or not a chat pane.
    pub fn load_older(&mut self, pane: PaneId) -> WorkspaceResult<usize> {
        let step = self.settings.chat.effective_window_step();
        Ok(self.registry.chat_mut(pane)?.load_older(step))
    }

    /// Deletes a message from a chat pane.
    ///
    /// Later chunks of a stream feeding the deleted message are dropped.
    ///
    /// # Errors
    ///
    /// Returns a registry error if the pane is not a chat pane or the
    /// message does not exist.
    pub fn delete_message(&mut self, pane: PaneId, message: MessageId) -> WorkspaceResult<Message> {
        self.registry
            .chat_mut(pane)?
            .delete_message(message)
            .ok_or_else(|| RegistryError::UnknownMessage(message).into())
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Applies an asynchronous event.
    ///
    /// Returns false if the event was ignored: its stream already ended,
    /// or its pane was closed or switched to other content.
    pub fn handle_event(&mut self, event: WorkspaceEvent) -> bool {
        match event {
            WorkspaceEvent::Chunk { stream_id, data } => {
                self.router.on_chunk(&mut self.registry, stream_id, &data)
            }
            WorkspaceEvent::Complete { stream_id } => {
                self.router.on_complete(&mut self.registry, stream_id)
            }
            WorkspaceEvent::Error { stream_id, error } => {
                self.router.on_error(&mut self.registry, stream_id, &error)
            }
            WorkspaceEvent::Interrupt { stream_id } => self.interrupt(stream_id),
            WorkspaceEvent::ContentLoaded {
                pane_id,
                conversation_id,
                messages,
            } => self.apply_transcript(pane_id, conversation_id.as_deref(), messages),
        }
    }

    fn apply_transcript(&mut self, pane: PaneId, conversation_id: Option<&str>, messages: Vec<Message>) -> bool {
        let Some(entry) = self.registry.get_mut(pane) else {
            tracing::debug!(pane_id = %pane, "Transcript for closed pane dropped");
            return false;
        };
        if !entry.shows(ContentType::Chat, conversation_id) {
            tracing::debug!(pane_id = %pane, "Transcript for replaced content dropped");
            return false;
        }
        let Some(chat) = entry.chat_mut() else {
            return false;
        };
        // Messages sent before the transcript arrived stay after it, unless
        // the transcript already holds them.
        let incoming: HashSet<MessageId> = messages.iter().map(|msg| msg.id).collect();
        let pending: Vec<Message> = chat
            .all_messages()
            .iter()
            .filter(|msg| !incoming.contains(&msg.id))
            .cloned()
            .collect();
        chat.set_messages(messages);
        for message in pending {
            chat.push(message);
        }
        true
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Captures the layout and the content fields of every pane.
    #[must_use]
    pub fn snapshot(&self) -> WorkspaceSnapshot {
        let panes = self
            .registry
            .ids()
            .into_iter()
            .filter_map(|id| {
                self.registry
                    .get(id)
                    .map(|entry| PaneSummary::from_entry(id, entry))
            })
            .collect();
        WorkspaceSnapshot::new(self.layout.clone(), panes, self.active_pane)
    }

    /// Replaces the workspace with a saved snapshot.
    ///
    /// All running streams are interrupted. Returns the content each pane
    /// must fetch again, in layout order; empty panes are omitted.
    ///
    /// # Errors
    ///
    /// Returns a layout error if the snapshot's tree breaks an invariant;
    /// the workspace is left unchanged in that case.
    pub fn restore(&mut self, snapshot: WorkspaceSnapshot) -> WorkspaceResult<Vec<(PaneId, ContentRequest)>> {
        let _span = trace_operation!(span_names::WORKSPACE_RESTORE, pane_count = snapshot.layout.pane_count()).entered();
        snapshot.validate()?;

        for pane in self.layout.pane_ids() {
            self.router
                .retire_pane(&mut self.registry, &mut self.transport, pane);
        }
        self.router.clear();

        self.registry = PaneRegistry::new();
        self.active_pane = None;
        self.layout = snapshot.layout;
        self.registry.sync(&self.layout);

        let window = self.settings.chat.effective_window_size();
        let mut pending = Vec::new();
        for pane in self.layout.pane_ids() {
            let Some(summary) = snapshot.panes.iter().find(|s| s.pane_id == pane) else {
                continue;
            };
            if summary.content_type == ContentType::Empty {
                continue;
            }
            let request = summary.request();
            self.registry.load(pane, request.clone(), window)?;
            pending.push((pane, request));
        }

        self.active_pane = snapshot
            .active_pane
            .filter(|pane| self.layout.contains_pane(*pane))
            .or_else(|| self.registry.most_recent());

        tracing::info!(
            panes = self.layout.pane_count(),
            pending = pending.len(),
            "Workspace restored"
        );
        Ok(pending)
    }

    /// Saves a snapshot to a store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot write the snapshot.
    pub fn save_to(&self, store: &mut dyn WorkspaceStore) -> SnapshotResult<()> {
        store.save(&self.snapshot())
    }

    /// Restores from a store if it holds a snapshot.
    ///
    /// Returns `Ok(None)` if the store is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored snapshot cannot be read or is invalid.
    pub fn restore_from(&mut self, store: &dyn WorkspaceStore) -> WorkspaceResult<Option<Vec<(PaneId, ContentRequest)>>> {
        match store.load()? {
            Some(snapshot) => self.restore(snapshot).map(Some),
            None => Ok(None),
        }
    }
}
