//! Pane content entries

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::ChatView;

/// Kind of content a pane shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Chat conversation
    Chat,
    /// Source editor
    Editor,
    /// Embedded browser
    Browser,
    /// Terminal session
    Terminal,
    /// PDF document
    Pdf,
    /// CSV table
    Csv,
    /// Word document
    Docx,
    /// Slide deck
    Pptx,
    /// LaTeX source with preview
    Latex,
    /// Nothing loaded yet
    #[default]
    Empty,
}

impl ContentType {
    /// All content types, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Chat,
        Self::Editor,
        Self::Browser,
        Self::Terminal,
        Self::Pdf,
        Self::Csv,
        Self::Docx,
        Self::Pptx,
        Self::Latex,
        Self::Empty,
    ];

    /// Returns the lowercase name used in serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Editor => "editor",
            Self::Browser => "browser",
            Self::Terminal => "terminal",
            Self::Pdf => "pdf",
            Self::Csv => "csv",
            Self::Docx => "docx",
            Self::Pptx => "pptx",
            Self::Latex => "latex",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| format!("unknown content type: {s}"))
    }
}

/// Request to show some content in a pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRequest {
    /// Kind of content
    pub content_type: ContentType,
    /// Opaque identifier of the content (conversation id, file path, URL)
    #[serde(default)]
    pub content_id: Option<String>,
}

impl ContentRequest {
    /// Creates a request for a chat conversation.
    #[must_use]
    pub fn chat(conversation_id: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::Chat,
            content_id: Some(conversation_id.into()),
        }
    }

    /// Creates a request for any content type.
    #[must_use]
    pub fn new(content_type: ContentType, content_id: Option<String>) -> Self {
        Self {
            content_type,
            content_id,
        }
    }
}

/// View state of a pane, depending on its content type.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    /// Nothing loaded
    #[default]
    Empty,
    /// Chat transcript
    Chat(ChatView),
    /// Any non-chat content, rendered outside this crate
    Document,
}

/// Registry entry describing what one pane shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PaneEntry {
    /// Kind of content
    pub content_type: ContentType,
    /// Opaque content identifier
    pub content_id: Option<String>,
    /// Per-content view state
    pub view: ViewState,
    pub(crate) sequence: u64,
    /// When the pane was created
    pub created_at: DateTime<Utc>,
}

impl PaneEntry {
    /// Creates an empty entry.
    #[must_use]
    pub(crate) fn empty(sequence: u64) -> Self {
        Self {
            content_type: ContentType::Empty,
            content_id: None,
            view: ViewState::Empty,
            sequence,
            created_at: Utc::now(),
        }
    }

    /// Switches the entry to new content with a fresh view state.
    pub fn load(&mut self, request: ContentRequest, window_size: usize) {
        self.view = match request.content_type {
            ContentType::Chat => ViewState::Chat(ChatView::new(window_size)),
            ContentType::Empty => ViewState::Empty,
            _ => ViewState::Document,
        };
        self.content_type = request.content_type;
        self.content_id = request.content_id;
    }

    /// Returns true if the entry shows the given content.
    #[must_use]
    pub fn shows(&self, content_type: ContentType, content_id: Option<&str>) -> bool {
        self.content_type == content_type && self.content_id.as_deref() == content_id
    }

    /// Returns the chat transcript, if this is a chat pane.
    #[must_use]
    pub const fn chat(&self) -> Option<&ChatView> {
        match &self.view {
            ViewState::Chat(chat) => Some(chat),
            _ => None,
        }
    }

    /// Returns the chat transcript mutably, if this is a chat pane.
    pub const fn chat_mut(&mut self) -> Option<&mut ChatView> {
        match &mut self.view {
            ViewState::Chat(chat) => Some(chat),
            _ => None,
        }
    }

    /// Returns the creation order of this entry within its registry.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}
