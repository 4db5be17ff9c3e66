//! PTY backend boundary
//!
//! The backend owns the child processes and PTY devices. Controllers talk to
//! it through [`PtyBackend`]; every call is a non-blocking request. Creation
//! is acknowledged later through the [`CreateAck`] carried by the request,
//! and output is pushed into the request's [`OutputSink`] in production
//! order.

use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use super::types::{Dimensions, SessionId};

/// Errors reported by a PTY backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Columns or rows were zero.
    #[error("invalid PTY dimensions: {cols}x{rows}")]
    InvalidDimensions {
        /// Requested columns
        cols: u16,
        /// Requested rows
        rows: u16,
    },

    /// A live session with this id already exists.
    #[error("session already exists: {0}")]
    DuplicateSession(SessionId),

    /// No session with this id exists.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// The PTY or child process could not be started.
    #[error("failed to start session: {0}")]
    SpawnFailed(String),

    /// The session was closed before creation finished.
    #[error("session closed during creation: {0}")]
    Cancelled(SessionId),

    /// The backend dropped the acknowledgment without answering.
    #[error("backend dropped the create acknowledgment")]
    AckDropped,

    /// Reading from or writing to the PTY failed.
    #[error("PTY I/O error: {0}")]
    Io(String),
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Destination for a session's output bytes.
///
/// Chunks are delivered in the order they are sent. Once the owning
/// controller is torn down, sends are discarded.
#[derive(Debug, Clone)]
pub struct OutputSink {
    tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl OutputSink {
    /// Pushes a chunk of output. Returns false if the pane is gone.
    pub fn send(&self, chunk: Vec<u8>) -> bool {
        self.tx.send(chunk).is_ok()
    }

    /// Returns true if the receiving pane has been torn down.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// One-shot acknowledgment of a create request.
#[derive(Debug)]
pub struct CreateAck {
    tx: oneshot::Sender<BackendResult<()>>,
}

impl CreateAck {
    /// Reports that the session is live.
    pub fn acknowledge(self) {
        let _ = self.tx.send(Ok(()));
    }

    /// Reports that creation failed.
    pub fn fail(self, error: BackendError) {
        let _ = self.tx.send(Err(error));
    }

    /// Returns true if nobody waits for this acknowledgment any more.
    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Everything the backend needs to start a session.
#[derive(Debug)]
pub struct CreateRequest {
    /// Session identifier
    pub id: SessionId,
    /// Initial PTY size, both dimensions non-zero
    pub size: Dimensions,
    /// Working directory of the shell, or the host's when `None`
    pub working_directory: Option<PathBuf>,
    /// Where output bytes go
    pub output: OutputSink,
    /// Completion signal
    pub ack: CreateAck,
}

/// Receiving halves kept by the controller for one create request.
#[derive(Debug)]
pub(crate) struct CreateChannels {
    pub(crate) output_rx: mpsc::UnboundedReceiver<Vec<u8>>,
    pub(crate) ack_rx: oneshot::Receiver<BackendResult<()>>,
}

impl CreateRequest {
    /// Builds a request together with the controller-side receivers.
    pub(crate) fn with_channels(
        id: SessionId,
        size: Dimensions,
        working_directory: Option<PathBuf>,
    ) -> (Self, CreateChannels) {
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let (ack_tx, ack_rx) = oneshot::channel();
        let request = Self {
            id,
            size,
            working_directory,
            output: OutputSink { tx: output_tx },
            ack: CreateAck { tx: ack_tx },
        };
        (request, CreateChannels { output_rx, ack_rx })
    }
}

/// Capability to run PTY sessions.
///
/// Implementations must not block the caller. `create` is called at most
/// once per live session id; `close` is idempotent and safe before creation
/// has completed.
pub trait PtyBackend: Send + Sync {
    /// Starts a session. The outcome is reported through `request.ack`;
    /// an immediate `Err` means the request was rejected outright.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot even be queued.
    fn create(&self, request: CreateRequest) -> BackendResult<()>;

    /// Sends input bytes to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or the write failed.
    fn write(&self, id: &SessionId, data: &[u8]) -> BackendResult<()>;

    /// Changes the PTY size.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or the resize failed.
    fn resize(&self, id: &SessionId, size: Dimensions) -> BackendResult<()>;

    /// Terminates the session and releases its PTY.
    ///
    /// # Errors
    ///
    /// Returns an error if cleanup failed; the session is gone either way.
    fn close(&self, id: &SessionId) -> BackendResult<()>;
}
