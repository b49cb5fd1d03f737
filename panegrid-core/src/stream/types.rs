//! Stream identifiers and routes

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layout::PaneId;

/// Identifier of one in-flight response stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamId(pub Uuid);

impl StreamId {
    /// Creates a new random stream ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StreamId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stream({})", self.0)
    }
}

/// Where the events of one stream are delivered.
///
/// A route exists from `send` until the stream completes, fails or is
/// interrupted. Events for a stream without a route are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRoute {
    /// Pane whose chat holds the streamed message
    pub pane_id: PaneId,
    /// When the stream was opened
    pub opened_at: DateTime<Utc>,
}

impl StreamRoute {
    /// Creates a route to the given pane, opened now.
    #[must_use]
    pub fn new(pane_id: PaneId) -> Self {
        Self {
            pane_id,
            opened_at: Utc::now(),
        }
    }
}

/// How a stream ended, as reported back to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The stream finished normally
    Completed,
    /// The stream failed with the given error text
    Failed(String),
    /// The user stopped the stream
    Interrupted,
}
