//! Wire frame decoding for streamed responses
//!
//! A response stream is a sequence of records separated by a blank line.
//! Each record holds one or more `data:` lines; their payloads, joined with
//! newlines, form either the `[DONE]` marker or a JSON object:
//!
//! ```text
//! data: {"choices":[{"delta":{"content":"Hel"}}]}
//!
//! data: {"type":"tool_complete","id":"t1","name":"grep","result_preview":"2 hits"}
//!
//! data: [DONE]
//! ```
//!
//! [`FrameDecoder`] reassembles records across chunk boundaries and
//! [`parse_payload`] turns one payload into a [`Frame`].

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::chat::{ToolCallDelta, ToolStatus};

/// Payload marking the end of a stream.
pub const DONE_MARKER: &str = "[DONE]";

/// Role value that flags a message as a decision record.
const DECISION_ROLE: &str = "decision";

/// Errors that can occur while parsing a payload
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The payload is not a JSON object of a known shape
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
}

/// Result type for frame parsing
pub type FrameResult<T> = Result<T, FrameError>;

/// Text and tool-call increments carried by one content frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentDelta {
    /// Text to append to the message content
    pub content: String,
    /// Text to append to the reasoning content
    pub reasoning: String,
    /// Tool-call updates
    pub tool_calls: Vec<ToolCallDelta>,
    /// True if the message should be marked as a decision
    pub is_decision: bool,
}

impl ContentDelta {
    fn is_empty(&self) -> bool {
        self.content.is_empty()
            && self.reasoning.is_empty()
            && self.tool_calls.is_empty()
            && !self.is_decision
    }
}

/// One parsed wire payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Content, reasoning and tool-call increments
    Delta(ContentDelta),
    /// Tool lifecycle updates
    ToolEvent(Vec<ToolCallDelta>),
    /// End-of-stream marker
    Done,
    /// A well-formed payload carrying nothing to apply
    Ignored,
}

// ============================================================================
// Record reassembly
// ============================================================================

/// Reassembles wire records from arbitrarily split chunks.
///
/// Only the incomplete trailing record is buffered between calls.
#[derive(Debug, Clone, Default)]
pub struct FrameDecoder {
    buffer: String,
}

impl FrameDecoder {
    /// Creates an empty decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Feeds a chunk and returns the payloads of all records it completes.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.buffer.push_str(chunk);
        if self.buffer.contains('\r') {
            self.buffer = self.buffer.replace("\r\n", "\n");
        }

        let mut payloads = Vec::new();
        while let Some(end) = self.buffer.find("\n\n") {
            let record: String = self.buffer.drain(..end + 2).collect();
            if let Some(payload) = record_payload(&record) {
                payloads.push(payload);
            }
        }
        payloads
    }

    /// Returns the payload of a final record not followed by a blank line.
    pub fn finish(&mut self) -> Option<String> {
        let record = std::mem::take(&mut self.buffer);
        record_payload(&record)
    }

    /// Returns the number of buffered bytes.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }
}

/// Joins the `data:` lines of one record.
fn record_payload(record: &str) -> Option<String> {
    let lines: Vec<&str> = record
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| data.strip_prefix(' ').unwrap_or(data))
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

// ============================================================================
// Payload parsing
// ============================================================================

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    choices: Vec<RawChoice>,
    #[serde(default, deserialize_with = "null_as_default")]
    tool_calls: Vec<RawToolCall>,
    id: Option<String>,
    name: Option<String>,
    args: Option<Value>,
    result_preview: Option<Value>,
    error: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawChoice {
    #[serde(default, deserialize_with = "null_as_default")]
    delta: RawDelta,
}

#[derive(Debug, Default, Deserialize)]
struct RawDelta {
    content: Option<String>,
    reasoning_content: Option<String>,
    role: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    tool_calls: Vec<RawToolCall>,
}

#[derive(Debug, Deserialize)]
struct RawToolCall {
    id: Option<String>,
    name: Option<String>,
    arguments: Option<Value>,
    args: Option<Value>,
    function: Option<RawFunction>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFunction {
    name: Option<String>,
    arguments: Option<Value>,
}

/// Renders a JSON value as text; strings are taken verbatim.
fn value_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn parse_status(status: Option<&str>) -> Option<ToolStatus> {
    match status? {
        "running" => Some(ToolStatus::Running),
        "complete" | "completed" => Some(ToolStatus::Complete),
        "error" | "failed" => Some(ToolStatus::Error),
        _ => None,
    }
}

impl RawToolCall {
    fn into_delta(self, status: Option<ToolStatus>) -> ToolCallDelta {
        let (function_name, function_arguments) = self
            .function
            .map_or((None, None), |f| (f.name, f.arguments));
        ToolCallDelta {
            id: self.id,
            name: self.name.or(function_name),
            arguments: value_text(self.arguments.or(self.args).or(function_arguments)),
            status: status.or_else(|| parse_status(self.status.as_deref())),
            result_preview: None,
        }
    }
}

/// Parses one payload.
///
/// # Errors
///
/// Returns [`FrameError::MalformedFrame`] if the payload is neither the
/// done marker nor a JSON object of a recognized shape.
pub fn parse_payload(payload: &str) -> FrameResult<Frame> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Ok(Frame::Ignored);
    }
    if payload == DONE_MARKER {
        return Ok(Frame::Done);
    }

    let mut raw: RawFrame =
        serde_json::from_str(payload).map_err(|e| FrameError::MalformedFrame(e.to_string()))?;

    let kind = raw.kind.take();
    match kind.as_deref() {
        Some("tool_execution_start") => {
            let deltas: Vec<ToolCallDelta> = raw
                .tool_calls
                .into_iter()
                .map(|call| call.into_delta(Some(ToolStatus::Running)))
                .collect();
            Ok(if deltas.is_empty() {
                Frame::Ignored
            } else {
                Frame::ToolEvent(deltas)
            })
        }
        Some(kind @ ("tool_start" | "tool_complete" | "tool_error")) => {
            Ok(Frame::ToolEvent(vec![tool_event_delta(kind, raw)]))
        }
        _ => Ok(content_frame(raw)),
    }
}

fn tool_event_delta(kind: &str, raw: RawFrame) -> ToolCallDelta {
    let (status, result_preview) = match kind {
        "tool_start" => (ToolStatus::Running, value_text(raw.result_preview)),
        "tool_complete" => (ToolStatus::Complete, value_text(raw.result_preview)),
        _ => (
            ToolStatus::Error,
            value_text(raw.error).or_else(|| value_text(raw.result_preview)),
        ),
    };
    ToolCallDelta {
        id: raw.id,
        name: raw.name,
        arguments: value_text(raw.args),
        status: Some(status),
        result_preview,
    }
}

fn content_frame(raw: RawFrame) -> Frame {
    let mut delta = ContentDelta::default();
    if let Some(choice) = raw.choices.into_iter().next() {
        let inner = choice.delta;
        delta.content = inner.content.unwrap_or_default();
        delta.reasoning = inner.reasoning_content.unwrap_or_default();
        delta.is_decision = inner.role.as_deref() == Some(DECISION_ROLE);
        delta
            .tool_calls
            .extend(inner.tool_calls.into_iter().map(|call| call.into_delta(None)));
    }
    delta
        .tool_calls
        .extend(raw.tool_calls.into_iter().map(|call| call.into_delta(None)));

    if delta.is_empty() {
        Frame::Ignored
    } else {
        Frame::Delta(delta)
    }
}
