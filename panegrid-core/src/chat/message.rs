//! Chat messages

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tool_call::ToolCall;
use crate::stream::StreamId;

/// Separator placed between existing content and an appended annotation.
const ANNOTATION_SEPARATOR: &str = "\n\n";

/// Unique identifier for a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub Uuid);

impl MessageId {
    /// Creates a new random message ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Written by the user
    User,
    /// Produced by the assistant
    Assistant,
    /// An assistant message flagged as a decision record
    Decision,
    /// Output of a tool invocation
    Tool,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
            Self::Decision => write!(f, "decision"),
            Self::Tool => write!(f, "tool"),
        }
    }
}

/// Whether a message completed normally or carries an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Regular message
    #[default]
    Normal,
    /// The stream producing this message failed
    Error,
}

/// A single chat message.
///
/// While `is_streaming` is set, `content` and `reasoning_content` only grow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier
    pub id: MessageId,
    /// Message author
    pub role: Role,
    /// Visible text
    pub content: String,
    /// Reasoning text streamed alongside the content
    #[serde(default)]
    pub reasoning_content: String,
    /// Tool calls made while producing this message
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    /// True while the message is still receiving deltas
    #[serde(default)]
    pub is_streaming: bool,
    /// Stream feeding this message, cleared when the stream ends
    #[serde(default)]
    pub stream_id: Option<StreamId>,
    /// Normal or error
    #[serde(default, rename = "type")]
    pub kind: MessageKind,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a finished message with the given role and content.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            reasoning_content: String::new(),
            tool_calls: Vec::new(),
            is_streaming: false,
            stream_id: None,
            kind: MessageKind::Normal,
            created_at: Utc::now(),
        }
    }

    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an empty assistant message waiting for `stream_id`.
    #[must_use]
    pub fn assistant_placeholder(stream_id: StreamId) -> Self {
        Self {
            is_streaming: true,
            stream_id: Some(stream_id),
            ..Self::new(Role::Assistant, "")
        }
    }

    /// Ends streaming for this message.
    pub fn finish_streaming(&mut self) {
        self.is_streaming = false;
        self.stream_id = None;
    }

    /// Appends an annotation such as an error notice after the content.
    pub fn annotate(&mut self, annotation: &str) {
        if !self.content.is_empty() {
            self.content.push_str(ANNOTATION_SEPARATOR);
        }
        self.content.push_str(annotation);
    }
}
