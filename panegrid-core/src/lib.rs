//! `PaneGrid` Core Library
//!
//! This crate provides the workspace model behind a split-pane chat and
//! document viewer: an n-ary layout tree of panes, a registry of what each
//! pane shows, and routing of streamed assistant responses into the right
//! chat transcript.
//!
//! # Crate Structure
//!
//! - [`layout`] - Immutable layout tree with split, close, move and resize
//! - [`registry`] - Per-pane content entries kept in sync with the layout
//! - [`chat`] - Messages, tool calls and windowed transcripts
//! - [`stream`] - Wire frame parsing and stream routing
//! - [`workspace`] - Coordinator tying layout, registry and streams together
//! - [`runtime`] - Single-owner event loop fed by a tokio channel
//! - [`persistence`] - Workspace snapshots and stores
//! - [`settings`] - TOML settings with clamped accessors
//! - [`tracing`] - Structured logging setup

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod chat;
pub mod error;
pub mod layout;
pub mod persistence;
pub mod registry;
pub mod runtime;
pub mod settings;
pub mod stream;
pub mod tracing;
pub mod workspace;

// =============================================================================
// Convenience re-exports
// =============================================================================

pub use chat::{
    ChatView, Message, MessageId, MessageKind, Role, ToolCall, ToolCallDelta, ToolStatus,
};
pub use error::{PaneGridError, Result};
pub use layout::{
    DropSide, LayoutError, LayoutNode, LayoutResult, LayoutTree, NodeId, PaneId, SplitDirection,
    SplitId,
};
pub use persistence::{
    JsonFileStore, MemoryStore, SNAPSHOT_VERSION, SnapshotError, WorkspaceSnapshot,
    WorkspaceStore,
};
pub use registry::{ContentRequest, ContentType, PaneRegistry, RegistryError, SyncReport};
pub use runtime::{EventSender, WorkspaceRuntime};
pub use settings::{SettingsError, SettingsManager, WorkspaceSettings};
pub use stream::{
    Frame, FrameDecoder, RecordingTransport, StreamId, StreamRouter, Transport, TransportError,
    parse_payload,
};
pub use tracing::{
    TracingConfig, TracingError, TracingLevel, TracingOutput, TracingResult, field_names,
    get_tracing_config, init_tracing, is_tracing_initialized, span_names,
};
pub use workspace::{Workspace, WorkspaceError, WorkspaceEvent, WorkspaceResult};
