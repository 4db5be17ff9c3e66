//! Layout transitions
//!
//! Growing a grid (or keeping its pane count) never loses work and is
//! committed immediately. Shrinking would kill running sessions, so it is
//! held as a [`PendingTransition`] until the user confirms which panes to
//! close, or cancels.

use std::collections::{BTreeSet, HashMap};

use crate::layout::{self, LayoutId};
use crate::project::ProjectId;

use super::error::{GridError, GridResult};
use super::tracker::ClosedPaneTracker;

/// A shrink that is waiting for the user's confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransition {
    /// Layout before the change
    pub from_layout: LayoutId,
    /// Requested layout
    pub to_layout: LayoutId,
    /// Pane count of `from_layout`
    pub from_count: usize,
    /// Pane count of `to_layout`
    pub to_count: usize,
    /// Label of `to_layout`
    pub to_label: &'static str,
}

impl PendingTransition {
    /// Number of panes that must be closed to confirm.
    #[must_use]
    pub const fn deficit(&self) -> usize {
        self.from_count - self.to_count
    }

    /// The panes proposed for closing: the trailing `deficit` indices,
    /// i.e. the most recently added panes.
    #[must_use]
    pub fn default_selection(&self) -> Vec<usize> {
        (self.to_count..self.from_count).collect()
    }
}

/// The user's pick of panes to close while a shrink is pending.
///
/// Starts with the default selection. Adding is refused once the selection
/// already holds `deficit` indices; the user deselects one first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShrinkSelection {
    deficit: usize,
    from_count: usize,
    selected: BTreeSet<usize>,
}

impl ShrinkSelection {
    /// Creates a selection pre-filled with the default proposal.
    #[must_use]
    pub fn new(pending: &PendingTransition) -> Self {
        Self {
            deficit: pending.deficit(),
            from_count: pending.from_count,
            selected: pending.default_selection().into_iter().collect(),
        }
    }

    /// Selects or deselects a pane. Returns true if the selection changed.
    pub fn toggle(&mut self, index: usize) -> bool {
        if index >= self.from_count {
            return false;
        }
        if self.selected.remove(&index) {
            return true;
        }
        if self.selected.len() >= self.deficit {
            return false;
        }
        self.selected.insert(index)
    }

    /// Returns true if the pane is selected for closing.
    #[must_use]
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Returns true once exactly `deficit` panes are selected.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.selected.len() == self.deficit
    }

    /// Number of panes still to select.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.deficit.saturating_sub(self.selected.len())
    }

    /// Selected indices in ascending order.
    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }
}

/// A layout change that has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedLayout {
    /// Project whose layout changed
    pub project: ProjectId,
    /// Layout before the change
    pub from_layout: LayoutId,
    /// Layout after the change
    pub to_layout: LayoutId,
    /// Panes closed by this change, ascending
    pub newly_closed: Vec<usize>,
    /// Previously closed panes forgotten because the grid shrank below them
    pub pruned: Vec<usize>,
}

/// Outcome of a layout change request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutChange {
    /// The change was lossless and must be applied now.
    Committed(CommittedLayout),
    /// The change would close panes and awaits confirmation.
    Pending(PendingTransition),
}

impl LayoutChange {
    /// Returns the pending transition, if confirmation is required.
    #[must_use]
    pub const fn pending(&self) -> Option<&PendingTransition> {
        match self {
            Self::Committed(_) => None,
            Self::Pending(pending) => Some(pending),
        }
    }
}

/// Adjudicates layout change requests.
///
/// Holds at most one pending transition per project; a newer request
/// replaces an older one.
#[derive(Debug, Clone, Default)]
pub struct TransitionCoordinator {
    pending: HashMap<ProjectId, PendingTransition>,
}

impl TransitionCoordinator {
    /// Creates a coordinator with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the pending transition of a project.
    #[must_use]
    pub fn pending(&self, project: ProjectId) -> Option<&PendingTransition> {
        self.pending.get(&project)
    }

    /// Adjudicates a request to move `project` from `current` to `target`.
    ///
    /// Any transition already pending for the project is discarded first.
    pub fn request(
        &mut self,
        project: ProjectId,
        current: LayoutId,
        target: LayoutId,
    ) -> LayoutChange {
        if let Some(previous) = self.pending.remove(&project) {
            tracing::debug!(
                project_id = %project,
                superseded = %previous.to_layout,
                "Pending layout transition superseded"
            );
        }

        let from = layout::layout(current);
        let to = layout::layout(target);

        if to.pane_count >= from.pane_count {
            tracing::info!(
                project_id = %project,
                from = %current,
                to = %target,
                "Layout change committed"
            );
            return LayoutChange::Committed(CommittedLayout {
                project,
                from_layout: current,
                to_layout: target,
                newly_closed: Vec::new(),
                pruned: Vec::new(),
            });
        }

        let pending = PendingTransition {
            from_layout: current,
            to_layout: target,
            from_count: from.pane_count,
            to_count: to.pane_count,
            to_label: to.label,
        };
        tracing::info!(
            project_id = %project,
            from = %current,
            to = %target,
            deficit = pending.deficit(),
            "Layout change awaiting confirmation"
        );
        self.pending.insert(project, pending.clone());
        LayoutChange::Pending(pending)
    }

    /// Confirms the pending shrink of `project`, closing `selection`.
    ///
    /// Closed indices that fall outside the smaller grid are pruned first;
    /// the selected panes are then recorded as closed so that growing the
    /// grid back does not silently reopen them. A selected pane that was
    /// already closed and lies outside the smaller grid is pruned like any
    /// other stale index.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the transition pending and the tracker
    /// untouched, if nothing is pending, an index is repeated or out of
    /// range, or the selection size differs from the deficit.
    pub fn confirm(
        &mut self,
        project: ProjectId,
        selection: &[usize],
        tracker: &mut ClosedPaneTracker,
    ) -> GridResult<CommittedLayout> {
        let pending = self
            .pending
            .get(&project)
            .ok_or(GridError::NoPendingTransition(project))?;

        let mut chosen = BTreeSet::new();
        for &index in selection {
            if index >= pending.from_count {
                return Err(GridError::PaneOutOfRange {
                    index,
                    pane_count: pending.from_count,
                });
            }
            if !chosen.insert(index) {
                return Err(GridError::DuplicateSelection(index));
            }
        }
        if chosen.len() != pending.deficit() {
            return Err(GridError::SelectionMismatch {
                expected: pending.deficit(),
                actual: chosen.len(),
            });
        }

        let Some(pending) = self.pending.remove(&project) else {
            return Err(GridError::NoPendingTransition(project));
        };

        let previously_closed: BTreeSet<usize> =
            tracker.closed_indices(project).into_iter().collect();
        let pruned = tracker.prune(project, pending.to_count);
        let mut newly_closed = Vec::new();
        for index in chosen {
            let stale = previously_closed.contains(&index) && index >= pending.to_count;
            if !stale && tracker.close(project, index) {
                newly_closed.push(index);
            }
        }

        tracing::info!(
            project_id = %project,
            from = %pending.from_layout,
            to = %pending.to_layout,
            closed = ?newly_closed,
            pruned = ?pruned,
            "Layout shrink confirmed"
        );

        Ok(CommittedLayout {
            project,
            from_layout: pending.from_layout,
            to_layout: pending.to_layout,
            newly_closed,
            pruned,
        })
    }

    /// Discards the pending transition of `project` without side effects.
    pub fn cancel(&mut self, project: ProjectId) -> Option<PendingTransition> {
        let cancelled = self.pending.remove(&project);
        if let Some(ref pending) = cancelled {
            tracing::info!(
                project_id = %project,
                to = %pending.to_layout,
                "Layout change cancelled"
            );
        }
        cancelled
    }

    /// Forgets anything pending for a removed project.
    pub fn clear_project(&mut self, project: ProjectId) {
        self.pending.remove(&project);
    }
}
