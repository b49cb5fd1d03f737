//! Chat transcript model
//!
//! Messages, tool calls and the windowed transcript held by chat panes.

mod message;
mod tool_call;
mod view;

pub use message::{Message, MessageId, MessageKind, Role};
pub use tool_call::{ToolCall, ToolCallDelta, ToolStatus, merge_tool_call};
pub use view::{ChatView, DEFAULT_WINDOW_SIZE};
