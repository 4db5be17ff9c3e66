//! Ordered project list with an active-project pointer

use thiserror::Error;

use crate::layout::LayoutId;

use super::model::{Project, ProjectId};

/// Name of the project created when the store would otherwise be empty.
pub const WELCOME_PROJECT_NAME: &str = "~";

/// Errors raised by project store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectError {
    /// No project with this id exists.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// A project with this id is already present.
    #[error("project already exists: {0}")]
    AlreadyExists(ProjectId),

    /// No project matches the given name or id.
    #[error("no project matches '{0}'")]
    NoMatch(String),

    /// More than one project matches the given name.
    #[error("'{0}' matches more than one project")]
    Ambiguous(String),
}

/// Result type for project store operations
pub type ProjectResult<T> = Result<T, ProjectError>;

/// The list of open projects in tab order.
///
/// Exactly one project is active whenever the list is non-empty. Switching
/// the active project only changes which grid is visible; every project's
/// sessions stay alive.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    projects: Vec<Project>,
    active: Option<ProjectId>,
}

impl ProjectStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from persisted parts.
    ///
    /// An active id that does not name a project falls back to the first
    /// project.
    #[must_use]
    pub fn from_parts(projects: Vec<Project>, active: Option<ProjectId>) -> Self {
        let active = active
            .filter(|id| projects.iter().any(|p| p.id == *id))
            .or_else(|| projects.first().map(|p| p.id));
        Self { projects, active }
    }

    /// All projects in tab order.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Number of projects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Returns true if there are no projects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Returns the project with the given id.
    #[must_use]
    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Returns the id of the visible project.
    #[must_use]
    pub const fn active_id(&self) -> Option<ProjectId> {
        self.active
    }

    /// Returns the visible project.
    #[must_use]
    pub fn active_project(&self) -> Option<&Project> {
        self.active.and_then(|id| self.get(id))
    }

    /// Finds a project by exact name, UUID, or case-insensitive name.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::NoMatch` if nothing matches and
    /// `ProjectError::Ambiguous` if a case-insensitive match is not unique.
    pub fn find(&self, name_or_id: &str) -> ProjectResult<&Project> {
        if let Some(project) = self.projects.iter().find(|p| p.name == name_or_id) {
            return Ok(project);
        }
        if let Ok(id) = name_or_id.parse::<ProjectId>() {
            if let Some(project) = self.get(id) {
                return Ok(project);
            }
        }
        let mut matches = self
            .projects
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case(name_or_id));
        match (matches.next(), matches.next()) {
            (Some(project), None) => Ok(project),
            (Some(_), Some(_)) => Err(ProjectError::Ambiguous(name_or_id.to_string())),
            (None, _) => Err(ProjectError::NoMatch(name_or_id.to_string())),
        }
    }

    /// Appends a project. The first project added becomes active.
    pub(crate) fn add(&mut self, project: Project) -> ProjectResult<ProjectId> {
        if self.get(project.id).is_some() {
            return Err(ProjectError::AlreadyExists(project.id));
        }
        let id = project.id;
        self.projects.push(project);
        if self.active.is_none() {
            self.active = Some(id);
        }
        Ok(id)
    }

    /// Removes a project. If it was active, the first remaining project
    /// becomes active.
    pub(crate) fn remove(&mut self, id: ProjectId) -> ProjectResult<Project> {
        let pos = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or(ProjectError::NotFound(id))?;
        let removed = self.projects.remove(pos);
        if self.active == Some(id) {
            self.active = self.projects.first().map(|p| p.id);
        }
        Ok(removed)
    }

    /// Makes a project the visible one.
    pub(crate) fn set_active(&mut self, id: ProjectId) -> ProjectResult<()> {
        if self.get(id).is_none() {
            return Err(ProjectError::NotFound(id));
        }
        self.active = Some(id);
        Ok(())
    }

    /// Changes a project's layout.
    pub(crate) fn set_layout(&mut self, id: ProjectId, layout_id: LayoutId) -> ProjectResult<()> {
        let project = self
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ProjectError::NotFound(id))?;
        project.layout_id = layout_id;
        Ok(())
    }

    /// Adds the welcome project when the store is empty.
    ///
    /// Returns the id of the created project, or `None` if the store already
    /// had projects.
    pub(crate) fn ensure_welcome_project(&mut self) -> Option<ProjectId> {
        if !self.projects.is_empty() {
            return None;
        }
        let project = Project::new(WELCOME_PROJECT_NAME, "", LayoutId::SideBySide);
        self.add(project).ok()
    }
}
