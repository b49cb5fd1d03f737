//! Event loop tests with producers on other tasks

use panegrid_core::chat::Message;
use panegrid_core::registry::ContentRequest;
use panegrid_core::runtime::WorkspaceRuntime;
use panegrid_core::settings::WorkspaceSettings;
use panegrid_core::stream::RecordingTransport;
use panegrid_core::workspace::Workspace;

fn record(text: &str) -> String {
    format!(
        "data: {}\n\n",
        serde_json::json!({ "choices": [{ "delta": { "content": text } }] })
    )
}

#[tokio::test]
async fn producers_on_separate_tasks_feed_one_loop() {
    let workspace = Workspace::new(RecordingTransport::new(), WorkspaceSettings::default());
    let (mut runtime, sender) = WorkspaceRuntime::new(workspace);
    let pane = runtime.workspace().active_pane().unwrap();
    runtime
        .workspace_mut()
        .load_content(pane, ContentRequest::chat("conv"))
        .unwrap();
    let stream = runtime.workspace_mut().send_message(pane, "question").unwrap();

    let transcript = sender.clone();
    let loader = tokio::spawn(async move {
        transcript.content_loaded(pane, Some("conv".to_string()), vec![Message::user("earlier")]);
    });
    let producer = sender.clone();
    let streamer = tokio::spawn(async move {
        // Wire data split in the middle of a record
        let wire = format!("{}{}", record("Hel"), record("lo"));
        let (head, tail) = wire.split_at(wire.len() / 2 + 3);
        producer.chunk(stream, head);
        producer.chunk(stream, tail);
        producer.complete(stream);
    });
    drop(sender);

    let processed = runtime.run().await;
    loader.await.unwrap();
    streamer.await.unwrap();

    assert_eq!(processed, 4);
    let chat = runtime.workspace().registry().chat(pane).unwrap();
    assert_eq!(chat.len(), 3);
    assert_eq!(chat.all_messages()[0].content, "earlier");
    let reply = &chat.all_messages()[2];
    assert_eq!(reply.content, "Hello");
    assert!(!reply.is_streaming);
}

#[tokio::test]
async fn interrupt_event_cancels_on_transport() {
    let workspace = Workspace::new(RecordingTransport::new(), WorkspaceSettings::default());
    let (mut runtime, sender) = WorkspaceRuntime::new(workspace);
    let pane = runtime.workspace().active_pane().unwrap();
    runtime
        .workspace_mut()
        .load_content(pane, ContentRequest::chat("conv"))
        .unwrap();
    let stream = runtime.workspace_mut().send_message(pane, "question").unwrap();

    sender.chunk(stream, record("partial"));
    sender.interrupt(stream);
    sender.chunk(stream, record(" ignored"));
    drop(sender);
    runtime.run().await;

    let workspace = runtime.into_workspace();
    assert_eq!(workspace.transport().cancelled, vec![stream]);
    let reply = &workspace.registry().chat(pane).unwrap().all_messages()[1];
    assert_eq!(reply.content, "partial\n\n[Interrupted]");
}
