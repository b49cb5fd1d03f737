//! Workspace coordination
//!
//! Ties the layout tree, pane registry and stream router together behind a
//! single set of user actions.

mod error;
mod event;
mod model;

pub use error::{WorkspaceError, WorkspaceResult};
pub use event::WorkspaceEvent;
pub use model::Workspace;
