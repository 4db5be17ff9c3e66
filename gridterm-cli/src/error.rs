//! CLI error types and exit codes.

use gridterm_core::{ConfigError, GridTermError, ProjectError, WorkspaceError};

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, validation, or other non-session errors
    pub const GENERAL_ERROR: i32 = 1;
    /// Session failure - a pane's shell could not be started or run
    pub const SESSION_FAILURE: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Project lookup or update failed
    #[error("Project error: {0}")]
    Project(String),

    /// Layout change or pane operation rejected
    #[error("Grid error: {0}")]
    Grid(String),

    /// Session could not be started or failed while running
    #[error("Session error: {0}")]
    Session(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<ProjectError> for CliError {
    fn from(err: ProjectError) -> Self {
        Self::Project(err.to_string())
    }
}

impl From<WorkspaceError> for CliError {
    fn from(err: WorkspaceError) -> Self {
        match err {
            WorkspaceError::Project(e) => Self::Project(e.to_string()),
            WorkspaceError::Grid(e) => Self::Grid(e.to_string()),
        }
    }
}

impl From<GridTermError> for CliError {
    fn from(err: GridTermError) -> Self {
        match err {
            GridTermError::Config(e) => e.into(),
            GridTermError::Project(e) => e.into(),
            GridTermError::Workspace(e) => e.into(),
            GridTermError::Session(e) => Self::Session(e.to_string()),
            GridTermError::Backend(e) => Self::Session(e.to_string()),
            GridTermError::Layout(e) => Self::Grid(e.to_string()),
            GridTermError::Grid(e) => Self::Grid(e.to_string()),
            GridTermError::Tracing(e) => Self::Config(e.to_string()),
        }
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, project, grid, IO)
    /// - 2: Session failure
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Session(_) => exit_codes::SESSION_FAILURE,
            Self::Config(_) | Self::Project(_) | Self::Grid(_) | Self::Io(_) => {
                exit_codes::GENERAL_ERROR
            }
        }
    }
}
