//! Workspace persistence
//!
//! A snapshot keeps the layout tree and the content fields of every pane.
//! View state such as chat transcripts is not stored; it is fetched again
//! after a restore.

mod snapshot;
mod store;

pub use snapshot::{
    PaneSummary, SNAPSHOT_VERSION, SnapshotError, SnapshotResult, WorkspaceSnapshot,
};
pub use store::{JsonFileStore, MemoryStore, WorkspaceStore};
