//! Coordinator flows across layout, registry and streams

use panegrid_core::chat::{Message, Role};
use panegrid_core::layout::{DropSide, PaneId};
use panegrid_core::registry::{ContentRequest, ContentType, RegistryError};
use panegrid_core::settings::WorkspaceSettings;
use panegrid_core::stream::{RecordingTransport, TransportError};
use panegrid_core::workspace::{Workspace, WorkspaceError, WorkspaceEvent};

fn workspace() -> (Workspace<RecordingTransport>, PaneId) {
    let workspace = Workspace::new(RecordingTransport::new(), WorkspaceSettings::default());
    let pane = workspace.active_pane().unwrap();
    (workspace, pane)
}

#[test]
fn registry_follows_every_layout_change() {
    let (mut ws, a) = workspace();
    let b = ws.split_pane(a, DropSide::Right).unwrap();
    let c = ws.split_pane(b, DropSide::Bottom).unwrap();
    let d = ws.split_pane(a, DropSide::Top).unwrap();

    ws.move_node(d, c, DropSide::Left).unwrap();
    ws.close_pane(b).unwrap();

    let mut in_layout = ws.layout().pane_ids();
    let mut in_registry = ws.registry().ids();
    in_layout.sort();
    in_registry.sort();
    assert_eq!(in_layout, in_registry);
    assert!(ws.layout().validate().is_ok());
}

#[test]
fn closing_streaming_pane_cancels_its_streams() {
    let (mut ws, a) = workspace();
    let b = ws.split_pane(a, DropSide::Right).unwrap();
    ws.load_content(a, ContentRequest::chat("a")).unwrap();
    ws.load_content(b, ContentRequest::chat("b")).unwrap();
    let kept = ws.send_message(a, "stay").unwrap();
    let first = ws.send_message(b, "one").unwrap();
    let second = ws.send_message(b, "two").unwrap();

    ws.close_pane(b).unwrap();

    let mut cancelled = ws.transport().cancelled.clone();
    cancelled.sort();
    let mut expected = vec![first, second];
    expected.sort();
    assert_eq!(cancelled, expected);
    assert!(ws.router().route(kept).is_some());
    assert!(!ws.handle_event(WorkspaceEvent::Complete { stream_id: first }));
}

#[test]
fn refused_stream_is_finalized_immediately() {
    let (mut ws, a) = workspace();
    ws.load_content(a, ContentRequest::chat("a")).unwrap();
    ws.transport_mut().fail_open = Some(TransportError::Unavailable("offline".to_string()));

    let stream = ws.send_message(a, "hello").unwrap();

    assert!(!ws.is_streaming());
    assert!(ws.router().route(stream).is_none());
    let reply = &ws.registry().chat(a).unwrap().all_messages()[1];
    assert_eq!(reply.stream_id, None);
    assert!(!reply.is_streaming);
    assert!(reply.content.contains("offline"));
}

#[test]
fn failed_cancel_still_interrupts_locally() {
    let (mut ws, a) = workspace();
    ws.load_content(a, ContentRequest::chat("a")).unwrap();
    let stream = ws.send_message(a, "hello").unwrap();
    ws.transport_mut().fail_cancel = Some(TransportError::Rejected("gone".to_string()));

    assert!(ws.interrupt(stream));
    assert!(!ws.is_streaming());
    let reply = &ws.registry().chat(a).unwrap().all_messages()[1];
    assert_eq!(reply.content, "[Interrupted]");
}

#[test]
fn deleting_streaming_message_drops_later_chunks() {
    let (mut ws, a) = workspace();
    ws.load_content(a, ContentRequest::chat("a")).unwrap();
    let stream = ws.send_message(a, "hello").unwrap();
    let reply_id = ws.registry().chat(a).unwrap().all_messages()[1].id;

    let removed = ws.delete_message(a, reply_id).unwrap();
    assert_eq!(removed.stream_id, Some(stream));

    assert!(ws.handle_event(WorkspaceEvent::Chunk {
        stream_id: stream,
        data: "data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n\n".to_string(),
    }));
    assert_eq!(ws.registry().chat(a).unwrap().len(), 1);
}

#[test]
fn switching_pane_to_document_rejects_chat_actions() {
    let (mut ws, a) = workspace();
    ws.load_content(a, ContentRequest::new(ContentType::Editor, Some("notes.md".into())))
        .unwrap();

    assert!(matches!(
        ws.send_message(a, "hi"),
        Err(WorkspaceError::Registry(RegistryError::NotAChatPane(p))) if p == a
    ));
    assert!(!ws.handle_event(WorkspaceEvent::ContentLoaded {
        pane_id: a,
        conversation_id: Some("notes.md".to_string()),
        messages: vec![Message::new(Role::User, "ignored")],
    }));
}

#[test]
fn transcript_for_closed_pane_is_ignored() {
    let (mut ws, a) = workspace();
    let b = ws.split_pane(a, DropSide::Right).unwrap();
    ws.load_content(b, ContentRequest::chat("b")).unwrap();
    ws.close_pane(b).unwrap();

    assert!(!ws.handle_event(WorkspaceEvent::ContentLoaded {
        pane_id: b,
        conversation_id: Some("b".to_string()),
        messages: vec![Message::user("late")],
    }));
}

#[test]
fn focus_rejects_unknown_pane() {
    let (mut ws, a) = workspace();
    let stranger = PaneId::new();
    assert!(matches!(ws.focus(stranger), Err(WorkspaceError::UnknownPane(p)) if p == stranger));
    assert_eq!(ws.active_pane(), Some(a));
}
