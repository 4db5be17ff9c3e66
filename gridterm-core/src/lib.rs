//! `gridterm` Core Library
//!
//! This crate provides the core of the gridterm multi-pane terminal host:
//! projects laid out as grids of terminal panes, each pane backed by its own
//! PTY session.
//!
//! # Crate Structure
//!
//! - [`layout`] - The fixed catalogue of grid layouts
//! - [`grid`] - Closed-pane tracking and layout transition adjudication
//! - [`project`] - Projects and the project store
//! - [`workspace`] - The state owner tying projects, grids and closed panes together
//! - [`session`] - Per-pane session controllers, the PTY backend boundary and the pane host
//! - [`pty`] - Native PTY backend on `portable-pty`
//! - [`config`] / [`persistence`] - Settings and saved project state
//! - [`tracing`] - Logging setup

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod grid;
pub mod layout;
pub mod persistence;
pub mod project;
pub mod pty;
pub mod session;
pub mod tracing;
pub mod workspace;

// =============================================================================
// Convenience re-exports
// =============================================================================

pub use config::{ConfigManager, Settings};
pub use error::{ConfigError, ConfigResult, GridTermError, GridTermResult};
pub use grid::{
    ClosedPaneTracker, CommittedLayout, GridError, GridResult, LayoutChange, PendingTransition,
    ShrinkSelection, TransitionCoordinator,
};
pub use layout::{
    GridGeometry, LAYOUTS, LayoutDef, LayoutError, LayoutId, LayoutResult, all_layouts, get_layout,
};
pub use persistence::ProjectState;
pub use project::{Project, ProjectError, ProjectId, ProjectStore};
pub use pty::{NativePtyBackend, ShellConfig};
pub use session::{
    BackendError, Dimensions, LivePane, OutputSink, PaneHost, PaneKey, PaneStatus, PtyBackend,
    RenderSurface, SessionController, SessionError, SessionId, SessionPhase, SessionTiming,
};
pub use workspace::{Workspace, WorkspaceError, WorkspaceResult};
