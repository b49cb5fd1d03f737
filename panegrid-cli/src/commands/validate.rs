//! Validate a saved workspace snapshot.

use std::path::Path;

use panegrid_core::error::PaneGridError;
use panegrid_core::persistence::WorkspaceSnapshot;

use crate::error::CliError;
use crate::util::read_snapshot;

/// Checks a snapshot and returns a one-line summary.
///
/// Pane summaries for panes missing from the layout are reported as
/// warnings, not failures; a restore simply skips them.
pub fn check_snapshot(snapshot: &WorkspaceSnapshot) -> Result<String, CliError> {
    snapshot
        .validate()
        .map_err(|e| CliError::from(PaneGridError::from(e)))?;

    let orphans = snapshot
        .panes
        .iter()
        .filter(|summary| !snapshot.layout.contains_pane(summary.pane_id))
        .count();
    if orphans > 0 {
        tracing::warn!(orphans, "Snapshot has summaries for panes not in the layout");
    }
    if let Some(active) = snapshot.active_pane
        && !snapshot.layout.contains_pane(active)
    {
        tracing::warn!(pane_id = %active, "Active pane is not in the layout");
    }

    Ok(format!(
        "valid: {} panes, depth {}",
        snapshot.layout.pane_count(),
        snapshot.layout.depth()
    ))
}

/// Validate snapshot command handler
pub fn cmd_validate(quiet: bool, path: &Path) -> Result<(), CliError> {
    let snapshot = read_snapshot(path)?;
    let summary = check_snapshot(&snapshot)?;
    if !quiet {
        println!("{summary}");
    }
    Ok(())
}
