//! CLI error types and exit codes.

use panegrid_core::error::PaneGridError;

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, script, IO or other failures
    pub const GENERAL_ERROR: i32 = 1;
    /// A snapshot or script produced a layout that breaks an invariant
    pub const INVALID_LAYOUT: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The script could not be read or parsed
    #[error("Script error: {0}")]
    Script(String),

    /// A script step failed
    #[error("Step {step} failed: {message}")]
    Step {
        /// 1-based step number
        step: usize,
        /// Failure description
        message: String,
    },

    /// A pane or stream alias was used before it was defined
    #[error("Unknown alias: {0}")]
    UnknownAlias(String),

    /// A snapshot could not be read or written
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Layout invariants do not hold
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// Output could not be produced
    #[error("Output error: {0}")]
    Output(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PaneGridError> for CliError {
    fn from(err: PaneGridError) -> Self {
        match err {
            PaneGridError::Layout(e) => Self::InvalidLayout(e.to_string()),
            PaneGridError::Snapshot(e) => Self::Snapshot(e.to_string()),
            PaneGridError::Settings(e) => Self::Config(e.to_string()),
            PaneGridError::Io(e) => Self::Io(e),
            other => Self::Script(other.to_string()),
        }
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, script, snapshot, IO)
    /// - 2: Invalid layout
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidLayout(_) => exit_codes::INVALID_LAYOUT,
            Self::Config(_)
            | Self::Script(_)
            | Self::Step { .. }
            | Self::UnknownAlias(_)
            | Self::Snapshot(_)
            | Self::Output(_)
            | Self::Io(_) => exit_codes::GENERAL_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panegrid_core::layout::LayoutError;

    #[test]
    fn layout_errors_map_to_invalid_layout() {
        let err: CliError = PaneGridError::from(LayoutError::EmptyWorkspace).into();
        assert_eq!(err.exit_code(), exit_codes::INVALID_LAYOUT);
    }

    #[test]
    fn step_errors_are_general() {
        let err = CliError::Step {
            step: 3,
            message: "unknown pane".to_string(),
        };
        assert_eq!(err.exit_code(), exit_codes::GENERAL_ERROR);
        assert_eq!(err.to_string(), "Step 3 failed: unknown pane");
    }
}
