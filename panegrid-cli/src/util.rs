//! Shared utility functions used across command modules.

use std::path::Path;

use panegrid_core::error::PaneGridError;
use panegrid_core::persistence::WorkspaceSnapshot;
use panegrid_core::settings::{SettingsManager, WorkspaceSettings};

use crate::error::CliError;

/// Loads workspace settings.
///
/// With a custom config directory the settings file there is loaded (and
/// created with defaults if missing). Otherwise the platform settings file is
/// read if it exists, falling back to defaults without writing anything.
pub fn load_settings(config_path: Option<&Path>) -> Result<WorkspaceSettings, CliError> {
    let manager = match config_path {
        Some(path) => SettingsManager::with_config_dir(path),
        None => match SettingsManager::new() {
            Ok(manager) if manager.settings_path().exists() => manager,
            _ => return Ok(WorkspaceSettings::default()),
        },
    };
    manager
        .load()
        .map_err(|e| CliError::Config(format!("Failed to load settings: {e}")))
}

/// Reads a snapshot file.
pub fn read_snapshot(path: &Path) -> Result<WorkspaceSnapshot, CliError> {
    WorkspaceSnapshot::load_from_file(path)
        .map_err(|e| CliError::from(PaneGridError::from(e)))
}
