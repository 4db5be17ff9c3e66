//! Error types for gridterm
//!
//! Each module defines its own error enum next to the code that raises it.
//! [`GridTermError`] wraps all of them for callers that deal with several
//! modules at once. Configuration errors live here because both the
//! settings file and the saved project state report through them.

use std::path::PathBuf;

use thiserror::Error;

use crate::grid::GridError;
use crate::layout::LayoutError;
use crate::project::ProjectError;
use crate::session::{BackendError, SessionError};
use crate::tracing::TracingError;
use crate::workspace::WorkspaceError;

/// Errors from loading or saving configuration and state files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A file could not be parsed
    #[error("Failed to parse {path}: {message}")]
    Parse {
        /// File that failed to parse
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// A value could not be serialized
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// A setting has an unusable value
    #[error("Invalid value for {field}: {reason}")]
    Validation {
        /// Setting name
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// No configuration directory could be determined
    #[error("Could not determine the configuration directory")]
    NoConfigDir,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Any error raised by gridterm-core.
#[derive(Debug, Error)]
pub enum GridTermError {
    /// Layout lookup failed
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Grid transition or pane operation failed
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Project operation failed
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// Workspace operation failed
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Session control failed
    #[error(transparent)]
    Session(#[from] SessionError),

    /// PTY backend failed
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Tracing setup failed
    #[error(transparent)]
    Tracing(#[from] TracingError),
}

/// Result type using [`GridTermError`]
pub type GridTermResult<T> = Result<T, GridTermError>;
