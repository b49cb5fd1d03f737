//! Tracing setup for structured logging
//!
//! Layout actions, registry syncs and stream events are logged through the
//! `tracing` crate. This module configures the subscriber and defines the
//! span and field names used across the crate.

use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Global flag indicating whether tracing has been initialized
static TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Configuration the subscriber was initialized with
static TRACING_CONFIG: OnceLock<TracingConfig> = OnceLock::new();

/// Crate targets covered by the default filter
const DEFAULT_TARGETS: [&str; 2] = ["panegrid_core", "panegrid"];

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// Failed to initialize tracing subscriber
    #[error("Failed to initialize tracing: {0}")]
    InitializationFailed(String),

    /// The custom filter string could not be parsed
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Tracing already initialized
    #[error("Tracing has already been initialized")]
    AlreadyInitialized,

    /// Failed to create log file
    #[error("Failed to create log file: {0}")]
    FileCreationFailed(String),
}

/// Result type for tracing operations
pub type TracingResult<T> = Result<T, TracingError>;

/// Tracing log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum TracingLevel {
    /// Error level - only errors
    Error,
    /// Warn level - errors and warnings (default)
    #[default]
    Warn,
    /// Info level - errors, warnings, and info
    Info,
    /// Debug level - all above plus debug messages
    Debug,
    /// Trace level - all messages including trace
    Trace,
}

impl TracingLevel {
    /// Converts to tracing crate's Level
    #[must_use]
    pub const fn to_tracing_level(self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Maps a `-v` repetition count onto a level, starting from `Warn`.
    #[must_use]
    pub const fn from_verbosity(count: u8) -> Self {
        match count {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }
}

impl std::str::FromStr for TracingLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for TracingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Output destination for tracing logs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TracingOutput {
    /// Output to stdout
    Stdout,
    /// Output to stderr
    #[default]
    Stderr,
    /// Output to a file, truncated on start
    File(PathBuf),
}

/// Configuration for tracing initialization
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Log level
    pub level: TracingLevel,
    /// Output destination
    pub output: TracingOutput,
    /// Whether to include thread ids in log lines
    pub thread_ids: bool,
    /// Custom filter string (overrides level if set)
    pub filter: Option<String>,
}

impl TracingConfig {
    /// Creates a new tracing configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the log level
    #[must_use]
    pub const fn with_level(mut self, level: TracingLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the output destination
    #[must_use]
    pub fn with_output(mut self, output: TracingOutput) -> Self {
        self.output = output;
        self
    }

    /// Enables or disables thread ids in log lines
    #[must_use]
    pub const fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.thread_ids = enabled;
        self
    }

    /// Sets a custom filter string
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Builds the `EnvFilter` for this configuration.
    ///
    /// # Errors
    ///
    /// Returns `TracingError::InvalidFilter` if the custom filter string
    /// cannot be parsed.
    pub fn env_filter(&self) -> TracingResult<EnvFilter> {
        if let Some(custom) = &self.filter {
            return EnvFilter::try_new(custom).map_err(|e| TracingError::InvalidFilter(e.to_string()));
        }
        let directives = DEFAULT_TARGETS
            .iter()
            .map(|target| format!("{target}={}", self.level))
            .collect::<Vec<_>>()
            .join(",");
        Ok(EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn")))
    }
}

fn install<W>(filter: EnvFilter, writer: W, config: &TracingConfig, ansi: bool) -> TracingResult<()>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(config.thread_ids)
                .with_ansi(ansi)
                .with_writer(writer),
        )
        .try_init()
        .map_err(|e| TracingError::InitializationFailed(e.to_string()))
}

/// Initializes the tracing subscriber with the given configuration
///
/// This function should be called once at application startup.
/// Subsequent calls will return an error.
///
/// # Errors
///
/// Returns an error if:
/// - Tracing has already been initialized
/// - The custom filter is invalid
/// - File output is configured but the file cannot be created
/// - The subscriber fails to initialize
pub fn init_tracing(config: &TracingConfig) -> TracingResult<()> {
    if TRACING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return Err(TracingError::AlreadyInitialized);
    }
    let _ = TRACING_CONFIG.set(config.clone());

    let filter = config.env_filter()?;
    match &config.output {
        TracingOutput::Stdout => install(filter, std::io::stdout, config, true)?,
        TracingOutput::Stderr => install(filter, std::io::stderr, config, true)?,
        TracingOutput::File(path) => {
            let file = std::fs::File::create(path)
                .map_err(|e| TracingError::FileCreationFailed(e.to_string()))?;
            install(filter, std::sync::Mutex::new(file), config, false)?;
        }
    }

    tracing::debug!(level = %config.level, "Tracing initialized");
    Ok(())
}

/// Checks if tracing has been initialized
#[must_use]
pub fn is_tracing_initialized() -> bool {
    TRACING_INITIALIZED.load(Ordering::SeqCst)
}

/// Gets the current tracing configuration (if initialized)
#[must_use]
pub fn get_tracing_config() -> Option<&'static TracingConfig> {
    TRACING_CONFIG.get()
}

/// Creates an info-level span with the standard naming scheme.
///
/// ```ignore
/// let _span = trace_operation!(span_names::LAYOUT_SPLIT, pane_id = %pane).entered();
/// ```
#[macro_export]
macro_rules! trace_operation {
    ($name:expr) => {
        tracing::info_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

/// Creates a debug-level span, for high-frequency operations such as chunks.
#[macro_export]
macro_rules! trace_operation_debug {
    ($name:expr) => {
        tracing::debug_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::debug_span!($name, $($field)*)
    };
}

/// Standard span names
pub mod span_names {
    /// Split a pane
    pub const LAYOUT_SPLIT: &str = "layout.split";
    /// Close a pane
    pub const LAYOUT_CLOSE: &str = "layout.close";
    /// Move a pane or subtree
    pub const LAYOUT_MOVE: &str = "layout.move";
    /// Resize a divider
    pub const LAYOUT_RESIZE: &str = "layout.resize";
    /// Reconcile registry with layout
    pub const REGISTRY_SYNC: &str = "registry.sync";
    /// Open a stream
    pub const STREAM_SEND: &str = "stream.send";
    /// Apply a chunk
    pub const STREAM_CHUNK: &str = "stream.chunk";
    /// Stream completed
    pub const STREAM_COMPLETE: &str = "stream.complete";
    /// Stream failed
    pub const STREAM_ERROR: &str = "stream.error";
    /// Stream interrupted
    pub const STREAM_INTERRUPT: &str = "stream.interrupt";
    /// Restore a saved workspace
    pub const WORKSPACE_RESTORE: &str = "workspace.restore";
}

/// Standard field names for spans and events
pub mod field_names {
    /// Pane id
    pub const PANE_ID: &str = "pane_id";
    /// Stream id
    pub const STREAM_ID: &str = "stream_id";
    /// Index path into the layout tree
    pub const PATH: &str = "path";
    /// Drop side
    pub const SIDE: &str = "side";
    /// Content type
    pub const CONTENT_TYPE: &str = "content_type";
    /// Error message
    pub const ERROR: &str = "error";
    /// Number of panes
    pub const PANE_COUNT: &str = "pane_count";
}
