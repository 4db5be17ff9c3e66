//! Projects
//!
//! A project is a root directory with its own grid of terminal panes. The
//! store keeps projects in tab order and tracks which one is visible.

mod model;
mod store;

pub use model::{Project, ProjectId};
pub use store::{ProjectError, ProjectResult, ProjectStore, WELCOME_PROJECT_NAME};
