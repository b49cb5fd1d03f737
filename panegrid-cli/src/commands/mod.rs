//! Command handler modules for the CLI.

mod replay;
mod show;
mod validate;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(config_path: Option<&Path>, quiet: bool, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Replay {
            script,
            format,
            save,
        } => replay::cmd_replay(config_path, quiet, &script, format, save.as_deref()),
        Commands::Show { snapshot, format } => show::cmd_show(quiet, &snapshot, format),
        Commands::Validate { snapshot } => validate::cmd_validate(quiet, &snapshot),
    }
}
