//! Per-project record of explicitly closed panes
//!
//! A closed pane keeps its slot in the grid but has no session; the renderer
//! shows a placeholder that reopens it. Projects without closed panes have no
//! entry at all.

use std::collections::{BTreeSet, HashMap};

use crate::project::ProjectId;

/// Tracks which pane indices the user has closed, per project.
///
/// # Example
///
/// ```
/// use gridterm_core::grid::ClosedPaneTracker;
/// use gridterm_core::project::ProjectId;
///
/// let mut tracker = ClosedPaneTracker::new();
/// let project = ProjectId::new();
///
/// tracker.close(project, 2);
/// assert!(tracker.is_closed(project, 2));
///
/// tracker.reopen(project, 2);
/// assert!(!tracker.is_closed(project, 2));
/// assert!(!tracker.has_entry(project));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClosedPaneTracker {
    closed: HashMap<ProjectId, BTreeSet<usize>>,
}

impl ClosedPaneTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a pane as closed. Returns true if it was open before.
    pub fn close(&mut self, project: ProjectId, index: usize) -> bool {
        self.closed.entry(project).or_default().insert(index)
    }

    /// Marks a pane as open again. Returns true if it was closed before.
    ///
    /// Reopening the last closed pane of a project drops the project's entry.
    pub fn reopen(&mut self, project: ProjectId, index: usize) -> bool {
        let Some(set) = self.closed.get_mut(&project) else {
            return false;
        };
        let removed = set.remove(&index);
        if set.is_empty() {
            self.closed.remove(&project);
        }
        removed
    }

    /// Returns true if the pane is closed.
    #[must_use]
    pub fn is_closed(&self, project: ProjectId, index: usize) -> bool {
        self.closed
            .get(&project)
            .is_some_and(|set| set.contains(&index))
    }

    /// Returns the closed indices of a project in ascending order.
    #[must_use]
    pub fn closed_indices(&self, project: ProjectId) -> Vec<usize> {
        self.closed
            .get(&project)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Returns true if the project has at least one closed pane.
    #[must_use]
    pub fn has_entry(&self, project: ProjectId) -> bool {
        self.closed.contains_key(&project)
    }

    /// Drops closed indices that no longer exist in a grid of `pane_count`
    /// panes and returns them in ascending order.
    ///
    /// Dropped indices are forgotten for good: growing the grid back does
    /// not close them again.
    pub fn prune(&mut self, project: ProjectId, pane_count: usize) -> Vec<usize> {
        let Some(set) = self.closed.get_mut(&project) else {
            return Vec::new();
        };
        let dropped: Vec<usize> = set.split_off(&pane_count).into_iter().collect();
        if set.is_empty() {
            self.closed.remove(&project);
        }
        dropped
    }

    /// Forgets every closed pane of a project.
    pub fn clear_project(&mut self, project: ProjectId) {
        self.closed.remove(&project);
    }

    /// Iterates over projects that have closed panes.
    pub fn iter(&self) -> impl Iterator<Item = (ProjectId, Vec<usize>)> + '_ {
        self.closed
            .iter()
            .map(|(id, set)| (*id, set.iter().copied().collect()))
    }
}
