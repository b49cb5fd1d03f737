//! Pane content registry
//!
//! Maps each pane id to a description of the content it shows. The registry
//! is reconciled with the layout tree's leaf set by [`PaneRegistry::sync`]
//! after every layout change.

mod entry;
mod error;
mod panes;

pub use entry::{ContentRequest, ContentType, PaneEntry, ViewState};
pub use error::{RegistryError, RegistryResult};
pub use panes::{PaneRegistry, SyncReport};
