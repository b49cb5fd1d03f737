//! Replay a scripted workspace session.
//!
//! A script is a JSON document with a list of steps. Panes and streams are
//! referred to by aliases: the first pane is called `main` unless the script
//! renames it, `split` names the new pane and `send` names the new stream.
//!
//! ```json
//! {
//!   "steps": [
//!     { "action": "split", "target": "main", "side": "right", "name": "chat" },
//!     { "action": "load", "pane": "chat", "content_type": "chat", "content_id": "c1" },
//!     { "action": "send", "pane": "chat", "message": "Hello", "stream": "s1" },
//!     { "action": "delta", "stream": "s1", "content": "Hi there" },
//!     { "action": "complete", "stream": "s1" }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use panegrid_core::chat::{Message, Role};
use panegrid_core::layout::{DropSide, PaneId};
use panegrid_core::registry::{ContentRequest, ContentType};
use panegrid_core::runtime::{EventSender, WorkspaceRuntime};
use panegrid_core::settings::WorkspaceSettings;
use panegrid_core::stream::{RecordingTransport, StreamId};
use panegrid_core::workspace::{Workspace, WorkspaceEvent};
use serde::Deserialize;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::format::render_tree;
use crate::util::load_settings;

/// Alias of the pane a workspace starts with
pub const INITIAL_PANE: &str = "main";

fn default_initial_pane() -> String {
    INITIAL_PANE.to_string()
}

/// A replay script
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Alias for the initial pane
    #[serde(default = "default_initial_pane")]
    pub initial_pane: String,
    /// Steps, applied in order
    pub steps: Vec<Step>,
}

impl Script {
    /// Parses a script from JSON.
    pub fn from_json(json: &str) -> Result<Self, CliError> {
        serde_json::from_str(json).map_err(|e| CliError::Script(e.to_string()))
    }
}

/// A message in a `transcript` step
#[derive(Debug, Deserialize)]
pub struct ScriptMessage {
    /// Author role
    pub role: Role,
    /// Message text
    pub content: String,
}

/// One scripted action
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Split a pane, naming the new one
    Split {
        /// Pane to split
        target: String,
        /// Side of the new pane
        side: DropSide,
        /// Alias for the new pane
        name: String,
    },
    /// Close a pane
    Close {
        /// Pane to close
        pane: String,
    },
    /// Move a pane next to another
    Move {
        /// Pane to move
        source: String,
        /// Pane to drop onto
        target: String,
        /// Side of the target
        side: DropSide,
    },
    /// Move a divider
    Resize {
        /// Index path of the split
        #[serde(default)]
        path: Vec<usize>,
        /// Child before the divider
        index: usize,
        /// Percentage points to move
        delta: f64,
    },
    /// Focus a pane
    Focus {
        /// Pane to focus
        pane: String,
    },
    /// Point a pane at content
    Load {
        /// Pane to load into
        pane: String,
        /// Kind of content
        content_type: ContentType,
        /// Content identifier
        #[serde(default)]
        content_id: Option<String>,
    },
    /// Deliver a loaded chat transcript
    Transcript {
        /// Chat pane
        pane: String,
        /// Messages, oldest first
        messages: Vec<ScriptMessage>,
    },
    /// Send a message and open a stream
    Send {
        /// Chat pane
        pane: String,
        /// Message text
        message: String,
        /// Alias for the new stream
        stream: String,
    },
    /// Deliver raw wire data
    Chunk {
        /// Target stream
        stream: String,
        /// Wire data
        data: String,
    },
    /// Deliver one content record
    Delta {
        /// Target stream
        stream: String,
        /// Content text
        #[serde(default)]
        content: String,
        /// Reasoning text
        #[serde(default)]
        reasoning: String,
    },
    /// Finish a stream
    Complete {
        /// Target stream
        stream: String,
    },
    /// Fail a stream
    Error {
        /// Target stream
        stream: String,
        /// Error text
        error: String,
    },
    /// Interrupt a stream
    Interrupt {
        /// Target stream
        stream: String,
    },
}

/// Result of a replay
pub struct ReplayOutcome {
    /// Final workspace
    pub workspace: Workspace<RecordingTransport>,
    /// Pane aliases
    pub panes: BTreeMap<String, PaneId>,
    /// Stream aliases
    pub streams: BTreeMap<String, StreamId>,
    /// Number of events the workspace ignored
    pub ignored_events: usize,
}

impl ReplayOutcome {
    fn pane_name(&self, pane: PaneId) -> String {
        self.panes
            .iter()
            .find(|(_, id)| **id == pane)
            .map_or_else(|| pane.to_string(), |(name, _)| name.clone())
    }

    /// Pane aliases still present in the layout, in layout order
    fn live_panes(&self) -> Vec<(String, PaneId)> {
        self.workspace
            .layout()
            .pane_ids()
            .into_iter()
            .map(|pane| (self.pane_name(pane), pane))
            .collect()
    }
}

struct Replayer {
    runtime: WorkspaceRuntime<RecordingTransport>,
    sender: EventSender,
    panes: BTreeMap<String, PaneId>,
    streams: BTreeMap<String, StreamId>,
    ignored_events: usize,
}

impl Replayer {
    fn pane(&self, alias: &str) -> Result<PaneId, CliError> {
        self.panes
            .get(alias)
            .copied()
            .ok_or_else(|| CliError::UnknownAlias(format!("pane '{alias}'")))
    }

    fn stream(&self, alias: &str) -> Result<StreamId, CliError> {
        self.streams
            .get(alias)
            .copied()
            .ok_or_else(|| CliError::UnknownAlias(format!("stream '{alias}'")))
    }

    async fn deliver(&mut self, event: WorkspaceEvent) -> Result<(), String> {
        if !self.sender.send(event) {
            return Err("event loop closed".to_string());
        }
        match self.runtime.next_event().await {
            Some(true) => {}
            Some(false) => self.ignored_events += 1,
            None => return Err("event loop closed".to_string()),
        }
        Ok(())
    }

    async fn apply(&mut self, step: Step) -> Result<(), CliError> {
        match step {
            Step::Split { target, side, name } => {
                let target = self.pane(&target)?;
                let pane = self
                    .runtime
                    .workspace_mut()
                    .split_pane(target, side)
                    .map_err(|e| CliError::Script(e.to_string()))?;
                self.panes.insert(name, pane);
            }
            Step::Close { pane } => {
                let pane = self.pane(&pane)?;
                self.runtime
                    .workspace_mut()
                    .close_pane(pane)
                    .map_err(|e| CliError::Script(e.to_string()))?;
            }
            Step::Move { source, target, side } => {
                let source = self.pane(&source)?;
                let target = self.pane(&target)?;
                self.runtime
                    .workspace_mut()
                    .move_node(source, target, side)
                    .map_err(|e| CliError::Script(e.to_string()))?;
            }
            Step::Resize { path, index, delta } => {
                self.runtime
                    .workspace_mut()
                    .resize(&path, index, delta)
                    .map_err(|e| CliError::Script(e.to_string()))?;
            }
            Step::Focus { pane } => {
                let pane = self.pane(&pane)?;
                self.runtime
                    .workspace_mut()
                    .focus(pane)
                    .map_err(|e| CliError::Script(e.to_string()))?;
            }
            Step::Load {
                pane,
                content_type,
                content_id,
            } => {
                let pane = self.pane(&pane)?;
                self.runtime
                    .workspace_mut()
                    .load_content(pane, ContentRequest::new(content_type, content_id))
                    .map_err(|e| CliError::Script(e.to_string()))?;
            }
            Step::Transcript { pane, messages } => {
                let pane_id = self.pane(&pane)?;
                let conversation_id = self
                    .runtime
                    .workspace()
                    .registry()
                    .get(pane_id)
                    .and_then(|entry| entry.content_id.clone());
                let messages = messages
                    .into_iter()
                    .map(|m| Message::new(m.role, m.content))
                    .collect();
                self.deliver(WorkspaceEvent::ContentLoaded {
                    pane_id,
                    conversation_id,
                    messages,
                })
                .await
                .map_err(CliError::Script)?;
            }
            Step::Send {
                pane,
                message,
                stream,
            } => {
                let pane = self.pane(&pane)?;
                let stream_id = self
                    .runtime
                    .workspace_mut()
                    .send_message(pane, &message)
                    .map_err(|e| CliError::Script(e.to_string()))?;
                self.streams.insert(stream, stream_id);
            }
            Step::Chunk { stream, data } => {
                let stream_id = self.stream(&stream)?;
                self.deliver(WorkspaceEvent::Chunk { stream_id, data })
                    .await
                    .map_err(CliError::Script)?;
            }
            Step::Delta {
                stream,
                content,
                reasoning,
            } => {
                let stream_id = self.stream(&stream)?;
                let mut delta = serde_json::Map::new();
                if !content.is_empty() {
                    delta.insert("content".to_string(), content.into());
                }
                if !reasoning.is_empty() {
                    delta.insert("reasoning_content".to_string(), reasoning.into());
                }
                let record = serde_json::json!({ "choices": [{ "delta": delta }] });
                self.deliver(WorkspaceEvent::Chunk {
                    stream_id,
                    data: format!("data: {record}\n\n"),
                })
                .await
                .map_err(CliError::Script)?;
            }
            Step::Complete { stream } => {
                let stream_id = self.stream(&stream)?;
                self.deliver(WorkspaceEvent::Complete { stream_id })
                    .await
                    .map_err(CliError::Script)?;
            }
            Step::Error { stream, error } => {
                let stream_id = self.stream(&stream)?;
                self.deliver(WorkspaceEvent::Error { stream_id, error })
                    .await
                    .map_err(CliError::Script)?;
            }
            Step::Interrupt { stream } => {
                let stream_id = self.stream(&stream)?;
                self.deliver(WorkspaceEvent::Interrupt { stream_id })
                    .await
                    .map_err(CliError::Script)?;
            }
        }
        Ok(())
    }
}

/// Runs a script against a fresh workspace.
pub fn run_script(script: Script, settings: WorkspaceSettings) -> Result<ReplayOutcome, CliError> {
    let workspace = Workspace::new(RecordingTransport::new(), settings);
    let initial = workspace
        .active_pane()
        .ok_or_else(|| CliError::Script("workspace has no initial pane".to_string()))?;
    let (runtime, sender) = WorkspaceRuntime::new(workspace);

    let mut replayer = Replayer {
        runtime,
        sender,
        panes: BTreeMap::from([(script.initial_pane, initial)]),
        streams: BTreeMap::new(),
        ignored_events: 0,
    };

    let executor = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    executor.block_on(async {
        for (index, step) in script.steps.into_iter().enumerate() {
            tracing::debug!(step = index + 1, ?step, "Applying step");
            replayer.apply(step).await.map_err(|e| match e {
                CliError::Script(message) => CliError::Step {
                    step: index + 1,
                    message,
                },
                other => other,
            })?;
        }
        Ok::<(), CliError>(())
    })?;

    Ok(ReplayOutcome {
        workspace: replayer.runtime.into_workspace(),
        panes: replayer.panes,
        streams: replayer.streams,
        ignored_events: replayer.ignored_events,
    })
}

/// Renders the final workspace as text.
pub fn render_text(outcome: &ReplayOutcome) -> String {
    let workspace = &outcome.workspace;
    let active = workspace.active_pane();
    let label = |pane: PaneId| {
        let mut text = outcome.pane_name(pane);
        if let Some(entry) = workspace.registry().get(pane) {
            let _ = write!(text, " ({}", entry.content_type);
            if let Some(id) = &entry.content_id {
                let _ = write!(text, ": {id}");
            }
            text.push(')');
        }
        if Some(pane) == active {
            text.push_str(" *");
        }
        text
    };

    let mut out = String::from("Layout:\n");
    out.push_str(&render_tree(workspace.layout(), &label));

    for (name, pane) in outcome.live_panes() {
        let Ok(chat) = workspace.registry().chat(pane) else {
            continue;
        };
        let _ = writeln!(out, "\nTranscript [{name}]:");
        if chat.is_empty() {
            out.push_str("  (no messages)\n");
        }
        for message in chat.visible_messages() {
            let marker = if message.is_streaming { " …" } else { "" };
            let _ = writeln!(out, "  {}: {}{marker}", message.role, message.content.replace('\n', "\n    "));
            for call in &message.tool_calls {
                let _ = writeln!(out, "    tool {} [{}] {}", call.name, call.status, call.arguments);
            }
        }
    }

    if !outcome.streams.is_empty() {
        out.push_str("\nStreams:\n");
        for (name, stream) in &outcome.streams {
            let state = if workspace.router().route(*stream).is_some() {
                "streaming"
            } else {
                "finished"
            };
            let _ = writeln!(out, "  {name}: {state}");
        }
    }
    let transport = workspace.transport();
    let _ = writeln!(
        out,
        "\nTransport: {} opened, {} cancelled, {} events ignored",
        transport.opened.len(),
        transport.cancelled.len(),
        outcome.ignored_events
    );
    out
}

/// Renders the final workspace as JSON.
pub fn render_json(outcome: &ReplayOutcome) -> Result<String, CliError> {
    let workspace = &outcome.workspace;
    let panes: Vec<serde_json::Value> = outcome
        .live_panes()
        .into_iter()
        .filter_map(|(name, pane)| {
            let entry = workspace.registry().get(pane)?;
            Some(serde_json::json!({
                "name": name,
                "pane_id": pane,
                "content_type": entry.content_type,
                "content_id": entry.content_id,
                "active": workspace.active_pane() == Some(pane),
                "messages": entry.chat().map(|chat| chat.all_messages().to_vec()),
            }))
        })
        .collect();
    let streams: BTreeMap<&String, bool> = outcome
        .streams
        .iter()
        .map(|(name, id)| (name, workspace.router().route(*id).is_some()))
        .collect();
    let value = serde_json::json!({
        "layout": workspace.layout(),
        "panes": panes,
        "streaming": streams,
        "ignored_events": outcome.ignored_events,
    });
    serde_json::to_string_pretty(&value).map_err(|e| CliError::Output(e.to_string()))
}

/// Replay command handler
pub fn cmd_replay(
    config_path: Option<&Path>,
    quiet: bool,
    script_path: &Path,
    format: OutputFormat,
    save: Option<&Path>,
) -> Result<(), CliError> {
    let settings = load_settings(config_path)?;
    let text = std::fs::read_to_string(script_path)?;
    let script = Script::from_json(&text)?;
    let outcome = run_script(script, settings)?;

    if let Some(path) = save {
        outcome
            .workspace
            .snapshot()
            .save_to_file(path)
            .map_err(|e| CliError::Snapshot(e.to_string()))?;
    }

    if !quiet {
        match format {
            OutputFormat::Text => print!("{}", render_text(&outcome)),
            OutputFormat::Json => println!("{}", render_json(&outcome)?),
        }
    }
    Ok(())
}
