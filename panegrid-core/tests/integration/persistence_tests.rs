//! Snapshot persistence through files and settings

use panegrid_core::layout::DropSide;
use panegrid_core::persistence::{JsonFileStore, SnapshotError, WorkspaceSnapshot, WorkspaceStore};
use panegrid_core::registry::{ContentRequest, ContentType};
use panegrid_core::settings::{STATE_FILE_NAME, SettingsManager, WorkspaceSettings};
use panegrid_core::stream::RecordingTransport;
use panegrid_core::workspace::Workspace;
use tempfile::TempDir;

#[test]
fn workspace_survives_restart_through_file_store() {
    let dir = TempDir::new().unwrap();
    let manager = SettingsManager::with_config_dir(dir.path());
    let settings = manager.load().unwrap();
    let state_path = manager.state_path(&settings);
    assert_eq!(state_path, dir.path().join(STATE_FILE_NAME));

    let mut first_run = Workspace::new(RecordingTransport::new(), settings.clone())
        .with_store(Box::new(JsonFileStore::new(&state_path)));
    let a = first_run.active_pane().unwrap();
    let b = first_run.split_pane(a, DropSide::Bottom).unwrap();
    first_run.load_content(a, ContentRequest::chat("conv-a")).unwrap();
    first_run
        .load_content(b, ContentRequest::new(ContentType::Csv, Some("data.csv".into())))
        .unwrap();
    let stream = first_run.send_message(a, "unfinished").unwrap();
    drop(first_run);

    let store = JsonFileStore::new(&state_path);
    let mut second_run = Workspace::new(RecordingTransport::new(), settings);
    let pending = second_run.restore_from(&store).unwrap().unwrap();

    assert_eq!(second_run.layout().pane_ids(), vec![a, b]);
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0], (a, ContentRequest::chat("conv-a")));
    assert!(!second_run.is_streaming());
    assert!(second_run.router().route(stream).is_none());
    assert!(second_run.registry().chat(a).unwrap().is_empty());
}

#[test]
fn restore_replaces_running_workspace() {
    let mut saved = Workspace::new(RecordingTransport::new(), WorkspaceSettings::default());
    let a = saved.active_pane().unwrap();
    saved.split_pane(a, DropSide::Left).unwrap();
    let snapshot = saved.snapshot();

    let mut live = Workspace::new(RecordingTransport::new(), WorkspaceSettings::default());
    let own = live.active_pane().unwrap();
    live.load_content(own, ContentRequest::chat("mine")).unwrap();
    let stream = live.send_message(own, "in flight").unwrap();

    live.restore(snapshot).unwrap();

    assert_eq!(live.transport().cancelled, vec![stream]);
    assert!(!live.registry().contains(own));
    assert_eq!(live.layout().pane_count(), 2);
}

#[test]
fn newer_snapshot_version_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("future.json");
    let workspace = Workspace::new(RecordingTransport::new(), WorkspaceSettings::default());
    let mut value = serde_json::to_value(workspace.snapshot()).unwrap();
    value["version"] = serde_json::json!(99);
    std::fs::write(&path, value.to_string()).unwrap();

    let result = JsonFileStore::new(&path).load();
    assert!(matches!(
        result,
        Err(SnapshotError::VersionMismatch { actual: 99, .. })
    ));
}

#[test]
fn corrupt_snapshot_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        WorkspaceSnapshot::load_from_file(&path),
        Err(SnapshotError::Deserialization(_))
    ));
}

#[test]
fn settings_roundtrip_through_manager() {
    let dir = TempDir::new().unwrap();
    let manager = SettingsManager::with_config_dir(dir.path().join("nested"));
    let mut settings = WorkspaceSettings::default();
    settings.chat.window_size = 12;
    settings.persistence.autosave = false;
    manager.save(&settings).unwrap();

    let loaded = manager.load().unwrap();
    assert_eq!(loaded.chat.window_size, 12);
    assert!(!loaded.persistence.autosave);
}
