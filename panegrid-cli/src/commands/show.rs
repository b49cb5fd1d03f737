//! Show a saved workspace snapshot.

use std::fmt::Write as _;
use std::path::Path;

use panegrid_core::layout::PaneId;
use panegrid_core::persistence::WorkspaceSnapshot;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::format::render_tree;
use crate::util::read_snapshot;

/// Renders a snapshot as text.
pub fn render_snapshot(snapshot: &WorkspaceSnapshot) -> String {
    let label = |pane: PaneId| {
        let mut text = pane.to_string();
        if let Some(summary) = snapshot.pane(pane) {
            let _ = write!(text, " ({}", summary.content_type);
            if let Some(id) = &summary.content_id {
                let _ = write!(text, ": {id}");
            }
            text.push(')');
        }
        if snapshot.active_pane == Some(pane) {
            text.push_str(" *");
        }
        text
    };

    let mut out = String::new();
    let _ = writeln!(out, "Snapshot Details:");
    let _ = writeln!(out, "  Version:  {}", snapshot.version);
    let _ = writeln!(out, "  Saved:    {}", snapshot.saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(out, "  Panes:    {}", snapshot.layout.pane_count());
    let _ = writeln!(out, "  Depth:    {}", snapshot.layout.depth());
    out.push_str("\nLayout:\n");
    out.push_str(&render_tree(&snapshot.layout, &label));
    out
}

/// Show snapshot command handler
pub fn cmd_show(quiet: bool, path: &Path, format: OutputFormat) -> Result<(), CliError> {
    let snapshot = read_snapshot(path)?;
    if quiet {
        return Ok(());
    }
    match format {
        OutputFormat::Text => print!("{}", render_snapshot(&snapshot)),
        OutputFormat::Json => println!(
            "{}",
            snapshot
                .to_json()
                .map_err(|e| CliError::Output(e.to_string()))?
        ),
    }
    Ok(())
}
