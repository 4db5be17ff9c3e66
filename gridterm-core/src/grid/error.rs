//! Error types for grid transitions and pane tracking

use thiserror::Error;

use crate::layout::LayoutError;
use crate::project::ProjectId;

/// Errors that can occur while changing a project's grid.
///
/// All of these indicate a caller bug: the UI only offers actions that are
/// valid for the current grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The project has no pending layout transition to confirm.
    #[error("no pending layout transition for project {0}")]
    NoPendingTransition(ProjectId),

    /// The number of selected panes does not match the pane deficit.
    #[error("selected {actual} pane(s) to close but the transition requires exactly {expected}")]
    SelectionMismatch {
        /// Panes that must be closed
        expected: usize,
        /// Panes that were selected
        actual: usize,
    },

    /// A selected pane index does not exist in the current layout.
    #[error("pane index {index} is outside the current layout of {pane_count} pane(s)")]
    PaneOutOfRange {
        /// Offending index
        index: usize,
        /// Pane count of the current layout
        pane_count: usize,
    },

    /// The same pane index was selected more than once.
    #[error("pane index {0} selected more than once")]
    DuplicateSelection(usize),

    /// Layout lookup failed.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Result type for grid operations
pub type GridResult<T> = Result<T, GridError>;
