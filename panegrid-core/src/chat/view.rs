//! Windowed view over a chat transcript

use serde::{Deserialize, Serialize};

use super::message::{Message, MessageId};
use crate::stream::StreamId;

/// Default number of messages shown at once.
pub const DEFAULT_WINDOW_SIZE: usize = 50;

/// Chat transcript of one pane plus the size of its visible window.
///
/// The visible messages are always the last `window_size` messages (or all
/// of them when there are fewer). Loading older history grows the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatView {
    all_messages: Vec<Message>,
    window_size: usize,
}

impl Default for ChatView {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl ChatView {
    /// Creates an empty transcript with the given window size.
    #[must_use]
    pub const fn new(window_size: usize) -> Self {
        Self {
            all_messages: Vec::new(),
            window_size,
        }
    }

    /// Returns every message, oldest first.
    #[must_use]
    pub fn all_messages(&self) -> &[Message] {
        &self.all_messages
    }

    /// Returns the visible suffix of the transcript.
    #[must_use]
    pub fn visible_messages(&self) -> &[Message] {
        let start = self.all_messages.len().saturating_sub(self.window_size);
        &self.all_messages[start..]
    }

    /// Returns the current window size.
    #[must_use]
    pub const fn window_size(&self) -> usize {
        self.window_size
    }

    /// Returns the number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.all_messages.len()
    }

    /// Returns true if the transcript has no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all_messages.is_empty()
    }

    /// Returns true if some messages are outside the window.
    #[must_use]
    pub fn has_older(&self) -> bool {
        self.all_messages.len() > self.window_size
    }

    /// Grows the window by `step` messages.
    ///
    /// Returns the number of newly visible messages.
    pub fn load_older(&mut self, step: usize) -> usize {
        let before = self.visible_messages().len();
        self.window_size = self.window_size.saturating_add(step);
        self.visible_messages().len() - before
    }

    /// Replaces the transcript, keeping the window size.
    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.all_messages = messages;
    }

    /// Appends a message.
    pub fn push(&mut self, message: Message) {
        self.all_messages.push(message);
    }

    /// Removes a message by id.
    pub fn delete_message(&mut self, id: MessageId) -> Option<Message> {
        let index = self.all_messages.iter().position(|msg| msg.id == id)?;
        Some(self.all_messages.remove(index))
    }

    /// Returns a message by id.
    #[must_use]
    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.all_messages.iter().find(|msg| msg.id == id)
    }

    /// Returns the message currently fed by `stream_id`.
    #[must_use]
    pub fn message_for_stream(&self, stream_id: StreamId) -> Option<&Message> {
        self.all_messages
            .iter()
            .rev()
            .find(|msg| msg.stream_id == Some(stream_id))
    }

    /// Returns the message currently fed by `stream_id`, mutably.
    pub fn message_for_stream_mut(&mut self, stream_id: StreamId) -> Option<&mut Message> {
        self.all_messages
            .iter_mut()
            .rev()
            .find(|msg| msg.stream_id == Some(stream_id))
    }
}
