//! Snapshot stores

use std::path::{Path, PathBuf};

use super::snapshot::{SnapshotResult, WorkspaceSnapshot};

/// Where workspace snapshots are kept.
pub trait WorkspaceStore {
    /// Stores a snapshot, replacing the previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save(&mut self, snapshot: &WorkspaceSnapshot) -> SnapshotResult<()>;

    /// Returns the stored snapshot, or `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored snapshot exists but cannot be read.
    fn load(&self) -> SnapshotResult<Option<WorkspaceSnapshot>>;
}

/// Store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store for the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorkspaceStore for JsonFileStore {
    fn save(&mut self, snapshot: &WorkspaceSnapshot) -> SnapshotResult<()> {
        snapshot.save_to_file(&self.path)?;
        tracing::debug!(path = %self.path.display(), "Workspace saved");
        Ok(())
    }

    fn load(&self) -> SnapshotResult<Option<WorkspaceSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        WorkspaceSnapshot::load_from_file(&self.path).map(Some)
    }
}

/// In-memory store holding the serialized form of the last snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    json: Option<String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkspaceStore for MemoryStore {
    fn save(&mut self, snapshot: &WorkspaceSnapshot) -> SnapshotResult<()> {
        self.json = Some(snapshot.to_json()?);
        Ok(())
    }

    fn load(&self) -> SnapshotResult<Option<WorkspaceSnapshot>> {
        self.json
            .as_deref()
            .map(WorkspaceSnapshot::from_json)
            .transpose()
    }
}
