//! Tool calls and incremental tool-call merging
//!
//! A tool call is reported piecemeal while a response streams: a start
//! event, argument updates, then a completion or error. Each report arrives
//! as a [`ToolCallDelta`] that is merged into the message's list of calls.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Execution state of a tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    /// The tool is executing
    #[default]
    Running,
    /// The tool finished successfully
    Complete,
    /// The tool failed
    Error,
}

impl ToolStatus {
    /// Returns true for `Complete` and `Error`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }

    /// Returns true if a call in this state may be reported as `next`.
    ///
    /// A finished call never goes back to `Running`.
    #[must_use]
    pub const fn can_become(self, next: Self) -> bool {
        !(self.is_terminal() && matches!(next, Self::Running))
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Complete => write!(f, "complete"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A tool invocation attached to an assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call identifier assigned by the model, empty if none was reported
    #[serde(default)]
    pub id: String,
    /// Tool name
    pub name: String,
    /// Serialized arguments
    #[serde(default)]
    pub arguments: String,
    /// Execution state
    #[serde(default)]
    pub status: ToolStatus,
    /// Short preview of the tool's result or error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_preview: Option<String>,
}

/// A partial update for one tool call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCallDelta {
    /// Call identifier, if the event carries one
    pub id: Option<String>,
    /// Tool name, if the event carries one
    pub name: Option<String>,
    /// Arguments, if the event carries them
    pub arguments: Option<String>,
    /// Reported state
    pub status: Option<ToolStatus>,
    /// Result preview or error text
    pub result_preview: Option<String>,
}

impl ToolCallDelta {
    fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    fn into_call(self) -> ToolCall {
        ToolCall {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            arguments: self.arguments.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            result_preview: self.result_preview,
        }
    }
}

impl ToolCall {
    /// Applies a delta to this call.
    ///
    /// Empty arguments never overwrite existing ones, and a finished call is
    /// never moved back to `Running`. Everything else in the delta is taken
    /// as the current state.
    pub fn apply(&mut self, delta: ToolCallDelta) {
        if self.id.is_empty()
            && let Some(id) = delta.id()
        {
            self.id = id.to_string();
        }
        if let Some(name) = delta.name() {
            self.name = name.to_string();
        }
        if let Some(arguments) = delta.arguments
            && !arguments.is_empty()
        {
            self.arguments = arguments;
        }
        if let Some(status) = delta.status
            && self.status.can_become(status)
        {
            self.status = status;
        }
        if delta.result_preview.is_some() {
            self.result_preview = delta.result_preview;
        }
    }
}

/// Finds the call a delta refers to.
///
/// A delta with an id matches the call with that id, or else the most recent
/// call of the same name that has no id yet. A delta without an id matches
/// the most recent call of the same name.
fn find_target(calls: &[ToolCall], delta: &ToolCallDelta) -> Option<usize> {
    if let Some(id) = delta.id()
        && let Some(index) = calls.iter().position(|call| call.id == id)
    {
        return Some(index);
    }
    let name = delta.name()?;
    let require_anonymous = delta.id().is_some();
    calls
        .iter()
        .rposition(|call| call.name == name && (!require_anonymous || call.id.is_empty()))
}

/// Merges a delta into a list of tool calls.
///
/// Calls are matched by id, then by the most recent call with the same name.
/// A delta whose id matches nothing only falls back to a same-name call that
/// has no id yet, so parallel calls to one tool stay separate.
///
/// Returns the index of the updated or appended call, or `None` if the delta
/// carried neither an id nor a name and matched nothing.
pub fn merge_tool_call(calls: &mut Vec<ToolCall>, delta: ToolCallDelta) -> Option<usize> {
    if let Some(index) = find_target(calls, &delta) {
        calls[index].apply(delta);
        return Some(index);
    }
    if delta.id().is_none() && delta.name().is_none() {
        return None;
    }
    calls.push(delta.into_call());
    Some(calls.len() - 1)
}
