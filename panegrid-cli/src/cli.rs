//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// `PaneGrid` command-line interface for replaying and inspecting workspaces
#[derive(Parser)]
#[command(name = "panegrid")]
#[command(author, version, about = "PaneGrid command-line interface")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration directory
    #[arg(short, long, global = true, env = "PANEGRID_CONFIG_DIR")]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Replay a script of workspace steps
    #[command(about = "Run a JSON script of layout and streaming steps and print the result")]
    Replay {
        /// Path to the script file
        script: PathBuf,

        /// Output format for the final workspace
        #[arg(short, long, default_value = "text", value_enum)]
        format: OutputFormat,

        /// Save the final workspace snapshot to this file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Show a saved workspace snapshot
    #[command(about = "Print the layout tree and panes of a saved snapshot")]
    Show {
        /// Path to the snapshot file
        snapshot: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text", value_enum)]
        format: OutputFormat,
    },

    /// Validate a saved workspace snapshot
    #[command(about = "Check the layout invariants of a saved snapshot")]
    Validate {
        /// Path to the snapshot file
        snapshot: PathBuf,
    },
}

/// Output format for commands that print a workspace
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tree and transcripts
    Text,
    /// Output as JSON
    Json,
}
