//! `PaneGrid` CLI - Command-line interface for `PaneGrid` workspaces
//!
//! Replays scripted layout and streaming sessions, and inspects or
//! validates saved workspace snapshots.

mod cli;
mod commands;
mod error;
mod format;
mod util;

use clap::Parser;
use cli::Cli;
use panegrid_core::tracing::{TracingConfig, TracingLevel, TracingOutput, init_tracing};

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let level = if cli.quiet {
        TracingLevel::Error
    } else {
        TracingLevel::from_verbosity(cli.verbose)
    };
    let tracing_config = TracingConfig::new()
        .with_level(level)
        .with_output(TracingOutput::Stderr);
    if let Err(e) = init_tracing(&tracing_config)
        && !cli.quiet
    {
        eprintln!("Warning: {e}");
    }

    let result = commands::dispatch(config_path, cli.quiet, cli.command);

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}
