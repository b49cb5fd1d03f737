//! Stream demultiplexer
//!
//! Every in-flight response has a route from its stream id to the pane that
//! asked for it. Chunk events carry only the stream id; the router resolves
//! the pane, finds the message fed by that stream inside the pane's chat and
//! applies the decoded frames to it. Streams never share a message, so the
//! order in which events of different streams are handled does not matter.

use std::collections::HashMap;

use super::frame::{ContentDelta, Frame, FrameDecoder, parse_payload};
use super::transport::{StreamRequest, Transport};
use super::types::{StreamId, StreamOutcome, StreamRoute};
use crate::chat::{Message, MessageKind, Role, ToolCallDelta, merge_tool_call};
use crate::layout::PaneId;
use crate::registry::{PaneRegistry, RegistryResult};
use crate::settings::StreamSettings;
use crate::tracing::span_names;
use crate::{trace_operation, trace_operation_debug};

/// Routes stream events to chat messages.
#[derive(Debug, Default)]
pub struct StreamRouter {
    routes: HashMap<StreamId, StreamRoute>,
    decoders: HashMap<StreamId, FrameDecoder>,
    settings: StreamSettings,
}

impl StreamRouter {
    /// Creates a router with no routes.
    #[must_use]
    pub fn new(settings: StreamSettings) -> Self {
        Self {
            routes: HashMap::new(),
            decoders: HashMap::new(),
            settings,
        }
    }

    /// Returns true while any stream is in flight.
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        !self.routes.is_empty()
    }

    /// Returns the route of a stream.
    #[must_use]
    pub fn route(&self, stream_id: StreamId) -> Option<&StreamRoute> {
        self.routes.get(&stream_id)
    }

    /// Returns the number of streams in flight.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.routes.len()
    }

    /// Returns the streams targeting a pane, oldest first.
    #[must_use]
    pub fn streams_for_pane(&self, pane_id: PaneId) -> Vec<StreamId> {
        let mut streams: Vec<(&StreamId, &StreamRoute)> = self
            .routes
            .iter()
            .filter(|(_, route)| route.pane_id == pane_id)
            .collect();
        streams.sort_by_key(|(id, route)| (route.opened_at, **id));
        streams.into_iter().map(|(id, _)| *id).collect()
    }

    /// Sends a user message from a chat pane and opens a response stream.
    ///
    /// Appends the user message and an empty streaming assistant message,
    /// registers the route and hands the request to the transport. If the
    /// transport refuses the request, the placeholder is finalized as an
    /// error right away; the stream id is returned either way.
    ///
    /// # Errors
    ///
    /// Returns a registry error if the pane is unknown or not a chat pane.
    pub fn send<T: Transport + ?Sized>(
        &mut self,
        registry: &mut PaneRegistry,
        transport: &mut T,
        pane_id: PaneId,
        content: &str,
    ) -> RegistryResult<StreamId> {
        let stream_id = StreamId::new();
        let _span = trace_operation!(span_names::STREAM_SEND, pane_id = %pane_id, stream_id = %stream_id).entered();

        let conversation_id = registry
            .get(pane_id)
            .and_then(|entry| entry.content_id.clone());
        let chat = registry.chat_mut(pane_id)?;
        chat.push(Message::user(content));
        chat.push(Message::assistant_placeholder(stream_id));

        self.routes.insert(stream_id, StreamRoute::new(pane_id));
        self.decoders.insert(stream_id, FrameDecoder::new());
        tracing::debug!(active = self.routes.len(), "Stream opened");

        let request = StreamRequest {
            stream_id,
            pane_id,
            conversation_id,
            content: content.to_string(),
        };
        if let Err(err) = transport.open_stream(request) {
            tracing::warn!(error = %err, "Transport refused stream");
            self.finish(registry, stream_id, StreamOutcome::Failed(err.to_string()));
        }
        Ok(stream_id)
    }

    /// Applies a raw chunk of wire data to the stream's message.
    ///
    /// Returns false if the stream has no route. Malformed frames are logged
    /// and skipped; the rest of the chunk is still applied.
    pub fn on_chunk(&mut self, registry: &mut PaneRegistry, stream_id: StreamId, chunk: &str) -> bool {
        let Some(route) = self.routes.get(&stream_id) else {
            tracing::trace!(stream_id = %stream_id, "Chunk for unknown stream dropped");
            return false;
        };
        let pane_id = route.pane_id;
        let _span = trace_operation_debug!(span_names::STREAM_CHUNK, stream_id = %stream_id).entered();

        let payloads = self
            .decoders
            .entry(stream_id)
            .or_default()
            .push(chunk);
        for payload in payloads {
            apply_payload(registry, pane_id, stream_id, &payload);
        }
        true
    }

    /// Marks the stream's message as finished and removes the route.
    ///
    /// A trailing record without a closing blank line is applied first.
    /// Returns false if the stream has no route.
    pub fn on_complete(&mut self, registry: &mut PaneRegistry, stream_id: StreamId) -> bool {
        let _span = trace_operation!(span_names::STREAM_COMPLETE, stream_id = %stream_id).entered();
        self.finish(registry, stream_id, StreamOutcome::Completed)
    }

    /// Marks the stream's message as failed and removes the route.
    ///
    /// Returns false if the stream has no route.
    pub fn on_error(&mut self, registry: &mut PaneRegistry, stream_id: StreamId, error: &str) -> bool {
        let _span = trace_operation!(span_names::STREAM_ERROR, stream_id = %stream_id).entered();
        self.finish(registry, stream_id, StreamOutcome::Failed(error.to_string()))
    }

    /// Stops a stream locally, then asks the transport to cancel it.
    ///
    /// The local state is final even if the cancel request fails. Returns
    /// false if the stream has no route.
    pub fn interrupt<T: Transport + ?Sized>(
        &mut self,
        registry: &mut PaneRegistry,
        transport: &mut T,
        stream_id: StreamId,
    ) -> bool {
        let _span = trace_operation!(span_names::STREAM_INTERRUPT, stream_id = %stream_id).entered();
        if !self.finish(registry, stream_id, StreamOutcome::Interrupted) {
            return false;
        }
        if let Err(err) = transport.cancel(stream_id) {
            tracing::warn!(error = %err, "Failed to cancel stream on transport");
        }
        true
    }

    /// Interrupts every stream targeting a pane.
    ///
    /// Returns the interrupted stream ids.
    pub fn retire_pane<T: Transport + ?Sized>(
        &mut self,
        registry: &mut PaneRegistry,
        transport: &mut T,
        pane_id: PaneId,
    ) -> Vec<StreamId> {
        let streams = self.streams_for_pane(pane_id);
        for stream_id in &streams {
            self.interrupt(registry, transport, *stream_id);
        }
        streams
    }

    /// Drops every route without touching any message.
    ///
    /// Used when the whole workspace is replaced.
    pub fn clear(&mut self) {
        self.routes.clear();
        self.decoders.clear();
    }

    fn finish(&mut self, registry: &mut PaneRegistry, stream_id: StreamId, outcome: StreamOutcome) -> bool {
        let Some(route) = self.routes.remove(&stream_id) else {
            tracing::trace!(stream_id = %stream_id, "Event for unknown stream dropped");
            return false;
        };
        let decoder = self.decoders.remove(&stream_id);

        if outcome == StreamOutcome::Completed
            && let Some(payload) = decoder.and_then(|mut d| d.finish())
        {
            apply_payload(registry, route.pane_id, stream_id, &payload);
        }

        if let Some(message) = find_message(registry, route.pane_id, stream_id) {
            match &outcome {
                StreamOutcome::Completed => {}
                StreamOutcome::Failed(error) => {
                    message.annotate(&self.settings.error_text(error));
                    message.kind = MessageKind::Error;
                }
                StreamOutcome::Interrupted => {
                    message.annotate(&self.settings.interrupted_annotation);
                }
            }
            message.finish_streaming();
        } else {
            tracing::debug!(stream_id = %stream_id, "Stream message no longer exists");
        }

        tracing::debug!(
            stream_id = %stream_id,
            outcome = ?outcome,
            remaining = self.routes.len(),
            "Stream finished"
        );
        true
    }
}

fn find_message(registry: &mut PaneRegistry, pane_id: PaneId, stream_id: StreamId) -> Option<&mut Message> {
    registry
        .chat_mut(pane_id)
        .ok()?
        .message_for_stream_mut(stream_id)
}

fn apply_payload(registry: &mut PaneRegistry, pane_id: PaneId, stream_id: StreamId, payload: &str) {
    let frame = match parse_payload(payload) {
        Ok(frame) => frame,
        Err(err) => {
            tracing::debug!(stream_id = %stream_id, error = %err, "Dropping malformed frame");
            return;
        }
    };
    match frame {
        Frame::Delta(delta) => {
            if let Some(message) = find_message(registry, pane_id, stream_id) {
                apply_delta(message, delta);
            }
        }
        Frame::ToolEvent(deltas) => {
            if let Some(message) = find_message(registry, pane_id, stream_id) {
                apply_tool_deltas(message, deltas);
            }
        }
        Frame::Done | Frame::Ignored => {}
    }
}

fn apply_delta(message: &mut Message, delta: ContentDelta) {
    message.content.push_str(&delta.content);
    message.reasoning_content.push_str(&delta.reasoning);
    if delta.is_decision {
        message.role = Role::Decision;
    }
    apply_tool_deltas(message, delta.tool_calls);
}

fn apply_tool_deltas(message: &mut Message, deltas: Vec<ToolCallDelta>) {
    for delta in deltas {
        merge_tool_call(&mut message.tool_calls, delta);
    }
}
