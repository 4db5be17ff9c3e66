//! Project data model

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layout::{self, LayoutDef, LayoutId};

/// Unique identifier for a project.
///
/// Assigned once when the project is created and stable for its lifetime,
/// including across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub Uuid);

impl ProjectId {
    /// Creates a new random project ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProjectId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A project: one root directory with its own grid of terminal panes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Stable identifier
    pub id: ProjectId,
    /// Display name (tab label)
    pub name: String,
    /// Working directory inherited by every pane session.
    /// Empty means "inherit the host's working directory".
    #[serde(default)]
    pub root_path: PathBuf,
    /// Selected grid layout
    #[serde(default)]
    pub layout_id: LayoutId,
}

impl Project {
    /// Creates a project with a fresh id.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        root_path: impl Into<PathBuf>,
        layout_id: LayoutId,
    ) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            root_path: root_path.into(),
            layout_id,
        }
    }

    /// Creates a project named after the last component of its root path.
    #[must_use]
    pub fn from_root(root_path: impl Into<PathBuf>, layout_id: LayoutId) -> Self {
        let root_path = root_path.into();
        let name = display_name_for(&root_path);
        Self::new(name, root_path, layout_id)
    }

    /// Returns the layout definition for this project.
    #[must_use]
    pub fn layout(&self) -> &'static LayoutDef {
        layout::layout(self.layout_id)
    }

    /// Returns the working directory for new sessions, if one is set.
    #[must_use]
    pub fn working_directory(&self) -> Option<&Path> {
        if self.root_path.as_os_str().is_empty() {
            None
        } else {
            Some(&self.root_path)
        }
    }
}

fn display_name_for(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| path.display().to_string())
}
