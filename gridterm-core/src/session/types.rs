//! Core type definitions for pane sessions

use std::fmt;
use std::time::Duration;

use crate::project::ProjectId;

/// Delay before the first dimension probe after a pane is mounted.
pub const DEFAULT_INITIAL_PROBE_DELAY_MS: u64 = 200;

/// Interval between dimension probes while the surface reports no size.
pub const DEFAULT_PROBE_RETRY_INTERVAL_MS: u64 = 100;

/// Quiet period that ends a burst of geometry changes.
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 600;

/// Gap between the two size samples of the stability check (one frame).
pub const DEFAULT_STABILITY_SAMPLE_DELAY_MS: u64 = 16;

/// Identity of a pane slot: a project and an index in its grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneKey {
    /// Owning project
    pub project: ProjectId,
    /// Index in the project's grid, row-major
    pub index: usize,
}

impl PaneKey {
    /// Creates a pane key.
    #[must_use]
    pub const fn new(project: ProjectId, index: usize) -> Self {
        Self { project, index }
    }

    /// The session id of this pane.
    ///
    /// Derived only from the project id and index, so re-mounting the same
    /// pane always yields the same id.
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        SessionId(format!("{}-{}", self.project, self.index))
    }
}

impl fmt::Display for PaneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.project, self.index)
    }
}

/// Identifier of a PTY session, as used on the backend boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub String);

impl SessionId {
    /// Creates a session id from any string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Character grid size of a terminal surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimensions {
    /// Columns
    pub cols: u16,
    /// Rows
    pub rows: u16,
}

impl Dimensions {
    /// Creates dimensions.
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Returns true if both columns and rows are non-zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.cols > 0 && self.rows > 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

/// Lifecycle phase of a session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Created but not mounted yet
    Uninitialized,
    /// Waiting for the surface to report a usable size
    AwaitingDimensions,
    /// Create request sent, acknowledgment outstanding
    Creating,
    /// Session is live and interactive
    Ready,
    /// A geometry change is being debounced and confirmed
    Resizing,
    /// The backend refused or failed the create request
    StartFailed,
    /// Teardown in progress
    Closing,
    /// Torn down; terminal
    Closed,
}

impl SessionPhase {
    /// Returns true if user input is forwarded in this phase.
    #[must_use]
    pub const fn accepts_input(self) -> bool {
        matches!(self, Self::Ready | Self::Resizing)
    }

    /// Returns true once teardown has begun.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closing | Self::Closed)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::AwaitingDimensions => "awaiting-dimensions",
            Self::Creating => "creating",
            Self::Ready => "ready",
            Self::Resizing => "resizing",
            Self::StartFailed => "start-failed",
            Self::Closing => "closing",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// What the renderer should show for a pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneStatus {
    /// Non-interactive "starting" indicator
    Starting,
    /// Live terminal
    Interactive,
    /// Start failed; the pane offers a manual retry
    StartFailed(String),
    /// Pane is gone
    Closed,
}

/// Timing constants of the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    /// Delay before the first dimension probe
    pub initial_probe_delay: Duration,
    /// Interval between dimension probes
    pub probe_retry_interval: Duration,
    /// Quiet period for geometry change bursts
    pub resize_debounce: Duration,
    /// Gap between the two samples of the stability check
    pub stability_sample_delay: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            initial_probe_delay: Duration::from_millis(DEFAULT_INITIAL_PROBE_DELAY_MS),
            probe_retry_interval: Duration::from_millis(DEFAULT_PROBE_RETRY_INTERVAL_MS),
            resize_debounce: Duration::from_millis(DEFAULT_RESIZE_DEBOUNCE_MS),
            stability_sample_delay: Duration::from_millis(DEFAULT_STABILITY_SAMPLE_DELAY_MS),
        }
    }
}
