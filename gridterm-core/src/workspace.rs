//! Workspace state
//!
//! [`Workspace`] owns the project list, the closed-pane sets and the
//! pending layout transitions, and is the only way to change them. Every
//! operation keeps the three consistent: removing a project forgets its
//! closed panes and pending transition, a committed layout change updates
//! the project's layout, and pane indices are checked against the current
//! grid.
//!
//! The set of panes that should be running is derived from this state by
//! [`Workspace::live_panes`], which a [`PaneHost`](crate::session::PaneHost)
//! reconciles against.

use thiserror::Error;

use crate::grid::{
    ClosedPaneTracker, CommittedLayout, GridError, LayoutChange, PendingTransition,
    TransitionCoordinator,
};
use crate::layout::LayoutId;
use crate::persistence::ProjectState;
use crate::project::{Project, ProjectError, ProjectId, ProjectStore};
use crate::session::{LivePane, PaneKey};
use crate::tracing::span_names;

/// Errors from workspace operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    /// Project lookup or mutation failed
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// Grid operation failed
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Result type for workspace operations
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// Projects, their grids and closed panes.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    store: ProjectStore,
    closed: ClosedPaneTracker,
    transitions: TransitionCoordinator,
}

impl Workspace {
    /// Creates an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a workspace from saved state.
    ///
    /// The state is repaired first: duplicate or impossible closed indices
    /// and closed sets of unknown projects are dropped.
    #[must_use]
    pub fn from_state(state: ProjectState) -> Self {
        let state = state.repaired();
        let mut closed = ClosedPaneTracker::new();
        for (project, indices) in state.closed {
            for index in indices {
                closed.close(project, index);
            }
        }
        Self {
            store: ProjectStore::from_parts(state.projects, state.active),
            closed,
            transitions: TransitionCoordinator::new(),
        }
    }

    /// Snapshot for persistence. Pending transitions are not saved.
    #[must_use]
    pub fn to_state(&self) -> ProjectState {
        let mut state = ProjectState::new();
        state.projects = self.store.projects().to_vec();
        state.active = self.store.active_id();
        state.closed = self.closed.iter().collect();
        state
    }

    /// The project list.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        self.store.projects()
    }

    /// The project store, for lookups.
    #[must_use]
    pub const fn store(&self) -> &ProjectStore {
        &self.store
    }

    /// The visible project.
    #[must_use]
    pub fn active_project(&self) -> Option<&Project> {
        self.store.active_project()
    }

    /// Looks up a project.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::NotFound` for unknown ids.
    pub fn project(&self, id: ProjectId) -> WorkspaceResult<&Project> {
        Ok(self.store.get(id).ok_or(ProjectError::NotFound(id))?)
    }

    /// Current layout of a project.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::NotFound` for unknown ids.
    pub fn layout(&self, id: ProjectId) -> WorkspaceResult<LayoutId> {
        Ok(self.project(id)?.layout_id)
    }

    /// Adds a project. The first project becomes active.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::AlreadyExists` if the id is taken.
    pub fn add_project(&mut self, project: Project) -> WorkspaceResult<ProjectId> {
        let name = project.name.clone();
        let id = self.store.add(project)?;
        tracing::info!(project_id = %id, %name, "Project added");
        Ok(id)
    }

    /// Removes a project with its closed panes and pending transition.
    ///
    /// Its sessions go away on the next reconcile.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::NotFound` for unknown ids.
    pub fn remove_project(&mut self, id: ProjectId) -> WorkspaceResult<Project> {
        let removed = self.store.remove(id)?;
        self.closed.clear_project(id);
        self.transitions.clear_project(id);
        tracing::info!(project_id = %id, name = %removed.name, "Project removed");
        Ok(removed)
    }

    /// Makes a project visible. Sessions of other projects keep running.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::NotFound` for unknown ids.
    pub fn set_active_project(&mut self, id: ProjectId) -> WorkspaceResult<()> {
        self.store.set_active(id)?;
        tracing::debug!(project_id = %id, "Project activated");
        Ok(())
    }

    /// Adds the welcome project if there are no projects.
    pub fn ensure_welcome_project(&mut self) -> Option<ProjectId> {
        let id = self.store.ensure_welcome_project()?;
        tracing::info!(project_id = %id, "Created welcome project");
        Some(id)
    }

    /// Asks to switch a project to another layout.
    ///
    /// Growing (or keeping the pane count) commits at once. Shrinking
    /// leaves the layout unchanged and returns the pending transition,
    /// which must be confirmed with a selection of panes to close or
    /// cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::NotFound` for unknown ids.
    pub fn request_layout_change(
        &mut self,
        id: ProjectId,
        target: LayoutId,
    ) -> WorkspaceResult<LayoutChange> {
        let _span =
            tracing::debug_span!(span_names::LAYOUT_CHANGE, project_id = %id, layout = %target)
                .entered();
        let current = self.layout(id)?;
        let change = self.transitions.request(id, current, target);
        if let LayoutChange::Committed(ref committed) = change {
            self.store.set_layout(id, committed.to_layout)?;
        }
        Ok(change)
    }

    /// The pending transition of a project.
    #[must_use]
    pub fn pending_transition(&self, id: ProjectId) -> Option<&PendingTransition> {
        self.transitions.pending(id)
    }

    /// Confirms a pending shrink, closing the selected panes.
    ///
    /// # Errors
    ///
    /// Returns `GridError::NoPendingTransition` if nothing is pending, or
    /// a selection error; the transition then stays pending.
    pub fn confirm_transition(
        &mut self,
        id: ProjectId,
        selection: &[usize],
    ) -> WorkspaceResult<CommittedLayout> {
        let committed = self.transitions.confirm(id, selection, &mut self.closed)?;
        self.store.set_layout(id, committed.to_layout)?;
        Ok(committed)
    }

    /// Drops a pending shrink; nothing changes.
    pub fn cancel_transition(&mut self, id: ProjectId) -> Option<PendingTransition> {
        self.transitions.cancel(id)
    }

    /// Closes one pane of a project.
    ///
    /// Returns false if the pane was already closed.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::NotFound` for unknown ids or
    /// `GridError::PaneOutOfRange` if the index is outside the grid.
    pub fn close_pane(&mut self, id: ProjectId, index: usize) -> WorkspaceResult<bool> {
        self.check_index(id, index)?;
        let closed = self.closed.close(id, index);
        if closed {
            tracing::debug!(project_id = %id, index, "Pane closed");
        }
        Ok(closed)
    }

    /// Reopens a closed pane of a project.
    ///
    /// Returns false if the pane was not closed.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::NotFound` for unknown ids or
    /// `GridError::PaneOutOfRange` if the index is outside the grid.
    pub fn reopen_pane(&mut self, id: ProjectId, index: usize) -> WorkspaceResult<bool> {
        self.check_index(id, index)?;
        let reopened = self.closed.reopen(id, index);
        if reopened {
            tracing::debug!(project_id = %id, index, "Pane reopened");
        }
        Ok(reopened)
    }

    /// Closed pane indices of a project, ascending.
    #[must_use]
    pub fn closed_indices(&self, id: ProjectId) -> Vec<usize> {
        self.closed.closed_indices(id)
    }

    /// Returns true if a pane is closed.
    #[must_use]
    pub fn is_pane_closed(&self, id: ProjectId, index: usize) -> bool {
        self.closed.is_closed(id, index)
    }

    /// Indices of a project's panes that are shown, ascending.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::NotFound` for unknown ids.
    pub fn visible_panes(&self, id: ProjectId) -> WorkspaceResult<Vec<usize>> {
        let project = self.project(id)?;
        Ok(self.open_indices(project))
    }

    /// Every pane of every project that should have a running session.
    ///
    /// Inactive projects are included so their sessions survive switching.
    #[must_use]
    pub fn live_panes(&self) -> Vec<LivePane> {
        self.store
            .projects()
            .iter()
            .flat_map(|project| {
                let working_directory = project.working_directory().map(ToOwned::to_owned);
                self.open_indices(project)
                    .into_iter()
                    .map(move |index| LivePane {
                        key: PaneKey::new(project.id, index),
                        working_directory: working_directory.clone(),
                    })
            })
            .collect()
    }

    fn open_indices(&self, project: &Project) -> Vec<usize> {
        (0..project.layout().pane_count)
            .filter(|&index| !self.closed.is_closed(project.id, index))
            .collect()
    }

    fn check_index(&self, id: ProjectId, index: usize) -> WorkspaceResult<()> {
        let pane_count = self.project(id)?.layout().pane_count;
        if index >= pane_count {
            return Err(GridError::PaneOutOfRange { index, pane_count }.into());
        }
        Ok(())
    }
}
