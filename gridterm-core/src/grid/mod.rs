//! Grid transitions and closed-pane tracking
//!
//! This module decides how a project's set of panes changes when its layout
//! changes or when individual panes are closed and reopened.
//!
//! # Module Structure
//!
//! - `tracker` - Per-project closed pane indices (`ClosedPaneTracker`)
//! - `transition` - Layout change adjudication (`TransitionCoordinator`)
//! - `error` - Error types (`GridError`)
//!
//! # Example
//!
//! ```
//! use gridterm_core::grid::{ClosedPaneTracker, LayoutChange, TransitionCoordinator};
//! use gridterm_core::layout::LayoutId;
//! use gridterm_core::project::ProjectId;
//!
//! let mut coordinator = TransitionCoordinator::new();
//! let mut tracker = ClosedPaneTracker::new();
//! let project = ProjectId::new();
//!
//! // Shrinking 2x2 -> solo needs confirmation
//! let change = coordinator.request(project, LayoutId::Grid2x2, LayoutId::Solo);
//! let pending = change.pending().unwrap();
//! assert_eq!(pending.deficit(), 3);
//!
//! let committed = coordinator
//!     .confirm(project, &pending.default_selection(), &mut tracker)
//!     .unwrap();
//! assert_eq!(committed.to_layout, LayoutId::Solo);
//! assert_eq!(tracker.closed_indices(project), vec![1, 2, 3]);
//! ```

mod error;
mod tracker;
mod transition;

pub use error::{GridError, GridResult};
pub use tracker::ClosedPaneTracker;
pub use transition::{
    CommittedLayout, LayoutChange, PendingTransition, ShrinkSelection, TransitionCoordinator,
};
