//! Workspace settings
//!
//! Settings are stored as TOML (`settings.toml` in the `panegrid` config
//! directory). Missing keys fall back to defaults, and out-of-range values
//! are clamped by the `effective_*` accessors rather than rejected.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chat::DEFAULT_WINDOW_SIZE;
use crate::layout::DEFAULT_MIN_PANE_PERCENT;

/// Name of the settings file inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Name of the default workspace state file inside the config directory.
pub const STATE_FILE_NAME: &str = "workspace.json";

/// Directory under the platform config dir used by default.
const APP_DIR_NAME: &str = "panegrid";

/// Largest allowed resize floor; two children at this floor fill a split.
const MAX_MIN_PANE_PERCENT: f64 = 50.0;

/// Placeholder replaced by the error text in the error annotation.
const ERROR_PLACEHOLDER: &str = "{error}";

/// Errors that can occur while loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid TOML for these settings
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be serialized
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// No config directory could be determined for this platform
    #[error("No configuration directory available")]
    NoConfigDir,
}

/// Result type for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Layout settings (`[layout]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Smallest share a resize may leave to a pane, in percent (0–50, default: 10)
    #[serde(default = "default_min_pane_percent")]
    pub min_pane_percent: f64,
}

const fn default_min_pane_percent() -> f64 {
    DEFAULT_MIN_PANE_PERCENT
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            min_pane_percent: default_min_pane_percent(),
        }
    }
}

impl LayoutSettings {
    /// Returns the resize floor clamped to the valid range (0–50)
    #[must_use]
    pub fn effective_min_pane_percent(&self) -> f64 {
        if self.min_pane_percent.is_finite() {
            self.min_pane_percent.clamp(0.0, MAX_MIN_PANE_PERCENT)
        } else {
            DEFAULT_MIN_PANE_PERCENT
        }
    }
}

/// Chat settings (`[chat]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Number of messages initially visible in a chat pane (default: 50)
    #[serde(default = "default_window")]
    pub window_size: usize,
    /// Number of older messages revealed per "load older" request (default: 50)
    #[serde(default = "default_window")]
    pub window_step: usize,
}

const fn default_window() -> usize {
    DEFAULT_WINDOW_SIZE
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            window_size: default_window(),
            window_step: default_window(),
        }
    }
}

impl ChatSettings {
    /// Returns the window size, at least 1
    #[must_use]
    pub fn effective_window_size(&self) -> usize {
        self.window_size.max(1)
    }

    /// Returns the window step, at least 1
    #[must_use]
    pub fn effective_window_step(&self) -> usize {
        self.window_step.max(1)
    }
}

/// Stream settings (`[stream]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSettings {
    /// Text appended to a message whose stream failed; `{error}` is replaced
    /// by the error text
    #[serde(default = "default_error_annotation")]
    pub error_annotation: String,
    /// Text appended to a message whose stream was interrupted
    #[serde(default = "default_interrupted_annotation")]
    pub interrupted_annotation: String,
}

fn default_error_annotation() -> String {
    "[Error: {error}]".to_string()
}

fn default_interrupted_annotation() -> String {
    "[Interrupted]".to_string()
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            error_annotation: default_error_annotation(),
            interrupted_annotation: default_interrupted_annotation(),
        }
    }
}

impl StreamSettings {
    /// Renders the error annotation for the given error text
    #[must_use]
    pub fn error_text(&self, error: &str) -> String {
        self.error_annotation.replace(ERROR_PLACEHOLDER, error)
    }
}

/// Persistence settings (`[persistence]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceSettings {
    /// Where the workspace is saved; defaults to `workspace.json` in the
    /// config directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
    /// Save the workspace after every layout change (default: true)
    #[serde(default = "default_true")]
    pub autosave: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            state_file: None,
            autosave: true,
        }
    }
}

impl PersistenceSettings {
    /// Returns the configured state file, or the default inside `config_dir`
    #[must_use]
    pub fn state_file_in(&self, config_dir: &Path) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| config_dir.join(STATE_FILE_NAME))
    }
}

/// All workspace settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    /// Layout settings
    #[serde(default)]
    pub layout: LayoutSettings,
    /// Chat settings
    #[serde(default)]
    pub chat: ChatSettings,
    /// Stream settings
    #[serde(default)]
    pub stream: StreamSettings,
    /// Persistence settings
    #[serde(default)]
    pub persistence: PersistenceSettings,
}

impl WorkspaceSettings {
    /// Parses settings from TOML text
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Parse` if the text is not valid settings TOML.
    pub fn from_toml(text: &str) -> SettingsResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Serializes settings to TOML text
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Serialize` if serialization fails.
    pub fn to_toml(&self) -> SettingsResult<String> {
        Ok(toml::to_string(self)?)
    }
}

/// Loads and saves [`WorkspaceSettings`] in a config directory
#[derive(Debug, Clone)]
pub struct SettingsManager {
    config_dir: PathBuf,
}

impl SettingsManager {
    /// Creates a manager for the platform config directory
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::NoConfigDir` if the platform has no config
    /// directory.
    pub fn new() -> SettingsResult<Self> {
        let base = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(Self::with_config_dir(base.join(APP_DIR_NAME)))
    }

    /// Creates a manager for an explicit config directory
    #[must_use]
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Returns the config directory
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Returns the path of the settings file
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE_NAME)
    }

    /// Returns the workspace state file for the given settings
    #[must_use]
    pub fn state_path(&self, settings: &WorkspaceSettings) -> PathBuf {
        settings.persistence.state_file_in(&self.config_dir)
    }

    /// Loads settings, writing defaults first if the file does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or created.
    pub fn load(&self) -> SettingsResult<WorkspaceSettings> {
        let path = self.settings_path();
        if !path.exists() {
            let settings = WorkspaceSettings::default();
            self.save(&settings)?;
            tracing::debug!(path = %path.display(), "Created default settings");
            return Ok(settings);
        }
        let text = std::fs::read_to_string(&path)?;
        WorkspaceSettings::from_toml(&text)
    }

    /// Saves settings, creating the config directory if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, settings: &WorkspaceSettings) -> SettingsResult<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::write(self.settings_path(), settings.to_toml()?)?;
        Ok(())
    }
}
