//! End-to-end layout and streaming scenarios

use panegrid_core::layout::{DropSide, LayoutNode, LayoutTree, PaneId, SplitDirection};
use panegrid_core::registry::ContentRequest;
use panegrid_core::settings::WorkspaceSettings;
use panegrid_core::stream::RecordingTransport;
use panegrid_core::workspace::{Workspace, WorkspaceEvent};

fn content_chunk(text: &str) -> String {
    format!(
        "data: {}\n\n",
        serde_json::json!({ "choices": [{ "delta": { "content": text } }] })
    )
}

#[test]
fn split_then_close_restores_single_pane() {
    let a = PaneId::new();
    let b = PaneId::new();
    let tree = LayoutTree::single(a);

    let split = tree.split(&[], DropSide::Right, b).unwrap();
    let root = split.root().and_then(LayoutNode::as_split).unwrap();
    assert_eq!(root.direction, SplitDirection::Horizontal);
    assert_eq!(root.sizes, vec![50.0, 50.0]);
    assert_eq!(split.pane_ids(), vec![a, b]);

    let closed = split.close(b, &[1]).unwrap();
    assert_eq!(closed, tree);
}

#[test]
fn closing_middle_of_three_equalizes_sizes() {
    let (a, b, c) = (PaneId::new(), PaneId::new(), PaneId::new());
    let root = LayoutNode::split_with_sizes(
        SplitDirection::Horizontal,
        vec![LayoutNode::leaf(a), LayoutNode::leaf(b), LayoutNode::leaf(c)],
        vec![34.0, 33.0, 33.0],
    );
    let tree = LayoutTree::try_from_root(root).unwrap();

    let closed = tree.close(b, &[1]).unwrap();

    let split = closed.root().and_then(LayoutNode::as_split).unwrap();
    assert_eq!(closed.pane_ids(), vec![a, c]);
    assert_eq!(split.sizes, vec![50.0, 50.0]);
}

#[test]
fn streamed_reply_accumulates_then_finishes() {
    let mut workspace = Workspace::new(RecordingTransport::new(), WorkspaceSettings::default());
    let pane = workspace.active_pane().unwrap();
    workspace
        .load_content(pane, ContentRequest::chat("conversation"))
        .unwrap();

    let stream = workspace.send_message(pane, "Say hello").unwrap();
    assert_eq!(workspace.transport().opened.len(), 1);

    for part in ["Hel", "lo"] {
        assert!(workspace.handle_event(WorkspaceEvent::Chunk {
            stream_id: stream,
            data: content_chunk(part),
        }));
    }
    {
        let reply = &workspace.registry().chat(pane).unwrap().all_messages()[1];
        assert_eq!(reply.content, "Hello");
        assert!(reply.is_streaming);
    }

    assert!(workspace.handle_event(WorkspaceEvent::Complete { stream_id: stream }));
    let reply = &workspace.registry().chat(pane).unwrap().all_messages()[1];
    assert!(!reply.is_streaming);
    assert!(workspace.router().route(stream).is_none());
}

#[test]
fn two_panes_stream_concurrently() {
    let mut workspace = Workspace::new(RecordingTransport::new(), WorkspaceSettings::default());
    let left = workspace.active_pane().unwrap();
    let right = workspace.split_pane(left, DropSide::Right).unwrap();
    workspace.load_content(left, ContentRequest::chat("l")).unwrap();
    workspace.load_content(right, ContentRequest::chat("r")).unwrap();

    let first = workspace.send_message(left, "one").unwrap();
    let second = workspace.send_message(right, "two").unwrap();

    workspace.handle_event(WorkspaceEvent::Chunk {
        stream_id: second,
        data: content_chunk("right"),
    });
    workspace.handle_event(WorkspaceEvent::Chunk {
        stream_id: first,
        data: content_chunk("left"),
    });
    workspace.handle_event(WorkspaceEvent::Error {
        stream_id: second,
        error: "timeout".to_string(),
    });

    let left_reply = &workspace.registry().chat(left).unwrap().all_messages()[1];
    let right_reply = &workspace.registry().chat(right).unwrap().all_messages()[1];
    assert_eq!(left_reply.content, "left");
    assert!(left_reply.is_streaming);
    assert_eq!(right_reply.content, "right\n\n[Error: timeout]");
    assert!(!right_reply.is_streaming);
    assert_eq!(workspace.router().active_count(), 1);
}
