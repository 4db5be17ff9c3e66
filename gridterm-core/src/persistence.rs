//! Saved project state
//!
//! The project list, the active project and the closed panes of each
//! project are stored as JSON in `projects.json`. Pending layout
//! transitions and running sessions are not persisted.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::layout;
use crate::project::{Project, ProjectId};

/// Current state file format version
pub const PROJECT_STATE_VERSION: u32 = 1;

/// File name of the saved state, inside the config directory
pub const PROJECT_STATE_FILE: &str = "projects.json";

/// Everything needed to restore the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectState {
    /// Format version
    #[serde(default = "default_version")]
    pub version: u32,
    /// When the state was written
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
    /// Projects in display order
    #[serde(default)]
    pub projects: Vec<Project>,
    /// Visible project
    #[serde(default)]
    pub active: Option<ProjectId>,
    /// Closed pane indices per project
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub closed: BTreeMap<ProjectId, Vec<usize>>,
}

const fn default_version() -> u32 {
    PROJECT_STATE_VERSION
}

impl Default for ProjectState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectState {
    /// Creates an empty state stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: PROJECT_STATE_VERSION,
            saved_at: Utc::now(),
            projects: Vec::new(),
            active: None,
            closed: BTreeMap::new(),
        }
    }

    /// Updates the timestamp.
    pub fn touch(&mut self) {
        self.saved_at = Utc::now();
    }

    /// Serializes to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses JSON. Unknown layout ids are rejected here.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Returns a copy with inconsistencies removed.
    ///
    /// Drops closed sets of unknown projects, duplicate indices and indices
    /// no catalogue layout can show, and clears an active id that names no
    /// project (the store then falls back to the first project). Indices
    /// beyond the current layout are kept: panes closed while confirming a
    /// shrink stay closed when the grid grows back.
    #[must_use]
    pub fn repaired(mut self) -> Self {
        let known: BTreeSet<ProjectId> = self.projects.iter().map(|p| p.id).collect();
        let limit = layout::max_pane_count();

        self.closed.retain(|project, indices| {
            if !known.contains(project) {
                tracing::warn!(project_id = %project, "Dropping closed panes of unknown project");
                return false;
            }
            let before = indices.len();
            indices.sort_unstable();
            indices.dedup();
            indices.retain(|&index| index < limit);
            if indices.len() != before {
                tracing::warn!(
                    project_id = %project,
                    dropped = before - indices.len(),
                    "Dropped invalid closed pane indices"
                );
            }
            !indices.is_empty()
        });

        if let Some(active) = self.active
            && !known.contains(&active)
        {
            tracing::warn!(project_id = %active, "Active project no longer exists");
            self.active = None;
        }
        self
    }
}
