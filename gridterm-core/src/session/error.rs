//! Error types for session control

use thiserror::Error;

use super::types::{PaneKey, SessionId, SessionPhase};

/// Errors raised by session controllers and the pane host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A manual start retry was requested for a session that has not failed.
    #[error("session {id} cannot be restarted while {phase}")]
    NotRetryable {
        /// Session identifier
        id: SessionId,
        /// Current phase
        phase: SessionPhase,
    },

    /// No controller is mounted for this pane.
    #[error("no session mounted for pane {0}")]
    PaneNotMounted(PaneKey),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
