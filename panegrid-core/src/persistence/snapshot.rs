//! Serializable workspace snapshots

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::layout::{LayoutResult, LayoutTree, PaneId};
use crate::registry::{ContentRequest, ContentType, PaneEntry};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors that can occur while saving or loading snapshots
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(serde_json::Error),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(serde_json::Error),

    /// Version mismatch
    #[error("Incompatible workspace snapshot version: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: u32,
        /// Actual version found
        actual: u32,
    },
}

/// Result type for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Content fields of one pane, without any view state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneSummary {
    /// Pane identifier
    pub pane_id: PaneId,
    /// Kind of content
    pub content_type: ContentType,
    /// Opaque content identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
}

impl PaneSummary {
    /// Summarizes a registry entry.
    #[must_use]
    pub fn from_entry(pane_id: PaneId, entry: &PaneEntry) -> Self {
        Self {
            pane_id,
            content_type: entry.content_type,
            content_id: entry.content_id.clone(),
        }
    }

    /// Returns the request that reloads this pane's content.
    #[must_use]
    pub fn request(&self) -> ContentRequest {
        ContentRequest::new(self.content_type, self.content_id.clone())
    }
}

/// Everything needed to rebuild a workspace after a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    /// Format version
    pub version: u32,
    /// When the snapshot was taken
    pub saved_at: DateTime<Utc>,
    /// Layout tree
    pub layout: LayoutTree,
    /// Content of each pane
    #[serde(default)]
    pub panes: Vec<PaneSummary>,
    /// Focused pane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_pane: Option<PaneId>,
}

impl WorkspaceSnapshot {
    /// Creates a snapshot stamped with the current time.
    #[must_use]
    pub fn new(layout: LayoutTree, panes: Vec<PaneSummary>, active_pane: Option<PaneId>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            layout,
            panes,
            active_pane,
        }
    }

    /// Checks the layout invariants of the stored tree.
    ///
    /// # Errors
    ///
    /// Returns the first layout invariant violation.
    pub fn validate(&self) -> LayoutResult<()> {
        self.layout.validate()
    }

    /// Returns the summary for a pane.
    #[must_use]
    pub fn pane(&self, pane_id: PaneId) -> Option<&PaneSummary> {
        self.panes.iter().find(|pane| pane.pane_id == pane_id)
    }

    /// Serializes the snapshot to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Serialization` if serialization fails.
    pub fn to_json(&self) -> SnapshotResult<String> {
        serde_json::to_string_pretty(self).map_err(SnapshotError::Serialization)
    }

    /// Parses a snapshot and checks its version.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Deserialization` for invalid JSON and
    /// `SnapshotError::VersionMismatch` for another format version.
    pub fn from_json(json: &str) -> SnapshotResult<Self> {
        let snapshot: Self = serde_json::from_str(json).map_err(SnapshotError::Deserialization)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                actual: snapshot.version,
            });
        }
        Ok(snapshot)
    }

    /// Saves the snapshot to a file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn save_to_file(&self, path: &Path) -> SnapshotResult<()> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a snapshot from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or parsing fails.
    pub fn load_from_file(path: &Path) -> SnapshotResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
