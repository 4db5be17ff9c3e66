//! Session controller
//!
//! One [`SessionController`] drives one pane's PTY session from mount to
//! teardown. It is a plain state machine: the owner feeds it the current
//! time through [`SessionController::poll`] and forwards geometry and input
//! events; the controller issues non-blocking requests to the backend.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized -> AwaitingDimensions -> Creating -> Ready <-> Resizing
//!                        ^                   |
//!                        |                   v
//!                        +------------- StartFailed
//!
//! any state -> Closing -> Closed
//! ```
//!
//! The surface has no size until it has been laid out, so creation waits
//! for a probe that reports positive dimensions. Geometry changes are
//! debounced and then sampled twice, one frame apart; only a stable size
//! that differs from the last applied one reaches the backend.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::tracing::span_names;

use super::backend::{BackendError, BackendResult, CreateRequest, PtyBackend};
use super::error::{SessionError, SessionResult};
use super::surface::RenderSurface;
use super::types::{Dimensions, PaneStatus, SessionId, SessionPhase, SessionTiming};

/// First sample of a pending stability check.
#[derive(Debug, Clone, Copy)]
struct StabilityCheck {
    at: Instant,
    first_sample: Dimensions,
}

/// Drives one pane's PTY session.
///
/// Dropping a controller tears its session down.
pub struct SessionController {
    id: SessionId,
    working_directory: Option<PathBuf>,
    backend: Arc<dyn PtyBackend>,
    surface: Box<dyn RenderSurface>,
    timing: SessionTiming,
    phase: SessionPhase,
    /// Size most recently sent to the backend (create or resize)
    last_applied: Option<Dimensions>,
    probe_at: Option<Instant>,
    probe_attempts: u32,
    debounce_at: Option<Instant>,
    stability_check: Option<StabilityCheck>,
    /// A geometry change arrived while the create was unacknowledged
    resize_while_creating: bool,
    create_ack: Option<oneshot::Receiver<BackendResult<()>>>,
    output: Option<mpsc::UnboundedReceiver<Vec<u8>>>,
    start_error: Option<String>,
}

impl SessionController {
    /// Creates an unmounted controller.
    #[must_use]
    pub fn new(
        id: SessionId,
        working_directory: Option<PathBuf>,
        backend: Arc<dyn PtyBackend>,
        surface: Box<dyn RenderSurface>,
        timing: SessionTiming,
    ) -> Self {
        Self {
            id,
            working_directory,
            backend,
            surface,
            timing,
            phase: SessionPhase::Uninitialized,
            last_applied: None,
            probe_at: None,
            probe_attempts: 0,
            debounce_at: None,
            stability_check: None,
            resize_while_creating: false,
            create_ack: None,
            output: None,
            start_error: None,
        }
    }

    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Size most recently sent to the backend.
    #[must_use]
    pub const fn last_applied(&self) -> Option<Dimensions> {
        self.last_applied
    }

    /// Number of dimension probes that found no usable size.
    #[must_use]
    pub const fn probe_attempts(&self) -> u32 {
        self.probe_attempts
    }

    /// What the renderer should show for this pane.
    #[must_use]
    pub fn status(&self) -> PaneStatus {
        match self.phase {
            SessionPhase::Uninitialized
            | SessionPhase::AwaitingDimensions
            | SessionPhase::Creating => PaneStatus::Starting,
            SessionPhase::Ready | SessionPhase::Resizing => PaneStatus::Interactive,
            SessionPhase::StartFailed => PaneStatus::StartFailed(
                self.start_error
                    .clone()
                    .unwrap_or_else(|| "failed to start".to_string()),
            ),
            SessionPhase::Closing | SessionPhase::Closed => PaneStatus::Closed,
        }
    }

    /// Earliest instant at which `poll` has timer work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.probe_at,
            self.debounce_at,
            self.stability_check.map(|check| check.at),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Starts the lifecycle: the first dimension probe runs after the
    /// initial probe delay.
    ///
    /// Mounting an already mounted controller is a no-op; returns true only
    /// when this call mounted it.
    pub fn mount(&mut self, now: Instant) -> bool {
        if self.phase != SessionPhase::Uninitialized {
            tracing::trace!(session_id = %self.id, phase = %self.phase, "Ignoring repeated mount");
            return false;
        }
        self.phase = SessionPhase::AwaitingDimensions;
        self.probe_at = Some(now + self.timing.initial_probe_delay);
        tracing::debug!(session_id = %self.id, "Session mounted, awaiting dimensions");
        true
    }

    /// Runs due timers, picks up the create acknowledgment and moves
    /// pending output to the surface.
    pub fn poll(&mut self, now: Instant) {
        if self.phase.is_terminal() || self.phase == SessionPhase::Uninitialized {
            return;
        }
        self.run_due_probe(now);
        self.check_create_ack(now);
        self.run_due_debounce(now);
        self.run_due_stability_check(now);
        self.drain_output();
    }

    /// Reports that the surface's container geometry changed.
    ///
    /// Bursts are coalesced: each call restarts the debounce period.
    pub fn notify_geometry_changed(&mut self, now: Instant) {
        match self.phase {
            SessionPhase::Ready | SessionPhase::Resizing => {
                self.phase = SessionPhase::Resizing;
                self.debounce_at = Some(now + self.timing.resize_debounce);
                self.stability_check = None;
            }
            SessionPhase::Creating => self.resize_while_creating = true,
            // The probe reads the size itself; later phases ignore geometry.
            _ => {}
        }
    }

    /// Forwards user input to the backend.
    ///
    /// Input is only forwarded while the session is interactive; otherwise
    /// it is dropped and false is returned.
    pub fn send_input(&mut self, data: &[u8]) -> bool {
        if !self.phase.accepts_input() {
            tracing::trace!(session_id = %self.id, phase = %self.phase, "Dropping input");
            return false;
        }
        if let Err(e) = self.backend.write(&self.id, data) {
            tracing::warn!(session_id = %self.id, %e, "PTY write failed");
        }
        true
    }

    /// Moves every pending output chunk to the surface, in arrival order.
    ///
    /// Output is held back until the session is ready. Returns the number
    /// of chunks written.
    pub fn drain_output(&mut self) -> usize {
        if !self.phase.accepts_input() {
            return 0;
        }
        let Some(output) = self.output.as_mut() else {
            return 0;
        };
        let mut written = 0;
        while let Ok(chunk) = output.try_recv() {
            self.surface.write_output(&chunk);
            written += 1;
        }
        written
    }

    /// Re-enters the dimension probe after a failed start. The probe runs
    /// at the next poll.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotRetryable` unless the start has failed.
    pub fn retry_start(&mut self, now: Instant) -> SessionResult<()> {
        if self.phase != SessionPhase::StartFailed {
            return Err(SessionError::NotRetryable {
                id: self.id.clone(),
                phase: self.phase,
            });
        }
        tracing::info!(session_id = %self.id, "Retrying session start");
        self.start_error = None;
        self.phase = SessionPhase::AwaitingDimensions;
        self.probe_at = Some(now);
        Ok(())
    }

    /// Tears the session down.
    ///
    /// Cancels every timer, stops delivering output and sends exactly one
    /// close request to the backend. Runs once; later calls do nothing.
    /// A failing close is logged and otherwise ignored.
    pub fn dispose(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        let _span =
            tracing::debug_span!(span_names::SESSION_CLOSE, session_id = %self.id).entered();
        let previous = self.phase;
        self.phase = SessionPhase::Closing;

        self.probe_at = None;
        self.debounce_at = None;
        self.stability_check = None;
        self.resize_while_creating = false;
        self.create_ack = None;
        self.output = None;

        if let Err(e) = self.backend.close(&self.id) {
            tracing::warn!(session_id = %self.id, %e, "PTY close failed, treating as closed");
        }
        self.phase = SessionPhase::Closed;
        tracing::debug!(session_id = %self.id, from = %previous, "Session closed");
    }

    fn run_due_probe(&mut self, now: Instant) {
        match self.probe_at {
            Some(at) if at <= now => self.probe_at = None,
            _ => return,
        }
        if self.phase != SessionPhase::AwaitingDimensions {
            return;
        }

        let size = self.surface.fit();
        if !size.is_positive() {
            self.probe_attempts += 1;
            self.probe_at = Some(now + self.timing.probe_retry_interval);
            tracing::trace!(
                session_id = %self.id,
                attempt = self.probe_attempts,
                %size,
                "Surface not laid out yet"
            );
            return;
        }
        self.start_create(size);
    }

    fn start_create(&mut self, size: Dimensions) {
        let _span =
            tracing::debug_span!(span_names::SESSION_CREATE, session_id = %self.id).entered();
        self.phase = SessionPhase::Creating;
        self.last_applied = Some(size);

        let (request, channels) =
            CreateRequest::with_channels(self.id.clone(), size, self.working_directory.clone());
        self.output = Some(channels.output_rx);
        self.create_ack = Some(channels.ack_rx);

        tracing::debug!(session_id = %self.id, %size, "Creating PTY session");
        if let Err(e) = self.backend.create(request) {
            self.fail_start(&e);
        }
    }

    fn check_create_ack(&mut self, now: Instant) {
        if self.phase != SessionPhase::Creating {
            return;
        }
        let Some(ack) = self.create_ack.as_mut() else {
            return;
        };
        match ack.try_recv() {
            Err(TryRecvError::Empty) => {}
            Ok(Ok(())) => {
                self.create_ack = None;
                self.phase = SessionPhase::Ready;
                tracing::info!(session_id = %self.id, "Session ready");
                if std::mem::take(&mut self.resize_while_creating) {
                    self.notify_geometry_changed(now);
                }
            }
            Ok(Err(e)) => self.fail_start(&e),
            Err(TryRecvError::Closed) => self.fail_start(&BackendError::AckDropped),
        }
    }

    fn fail_start(&mut self, error: &BackendError) {
        tracing::error!(session_id = %self.id, %error, "Session failed to start");
        self.phase = SessionPhase::StartFailed;
        self.start_error = Some(error.to_string());
        self.create_ack = None;
        self.output = None;
        self.resize_while_creating = false;
    }

    fn run_due_debounce(&mut self, now: Instant) {
        match self.debounce_at {
            Some(at) if at <= now => self.debounce_at = None,
            _ => return,
        }
        let first_sample = self.surface.fit();
        self.stability_check = Some(StabilityCheck {
            at: now + self.timing.stability_sample_delay,
            first_sample,
        });
    }

    fn run_due_stability_check(&mut self, now: Instant) {
        let check = match self.stability_check {
            Some(check) if check.at <= now => check,
            _ => return,
        };
        self.stability_check = None;
        if self.phase != SessionPhase::Resizing {
            return;
        }
        self.phase = SessionPhase::Ready;

        let size = self.surface.fit();
        if !size.is_positive() || size != check.first_sample {
            tracing::trace!(
                session_id = %self.id,
                first = %check.first_sample,
                second = %size,
                "Discarding unstable size"
            );
            return;
        }
        if self.last_applied == Some(size) {
            return;
        }

        self.last_applied = Some(size);
        let _span =
            tracing::debug_span!(span_names::SESSION_RESIZE, session_id = %self.id).entered();
        tracing::debug!(session_id = %self.id, %size, "Resizing PTY");
        if let Err(e) = self.backend.resize(&self.id, size) {
            tracing::warn!(session_id = %self.id, %e, "PTY resize failed");
        }
    }
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("last_applied", &self.last_applied)
            .field("probe_attempts", &self.probe_attempts)
            .finish_non_exhaustive()
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.dispose();
    }
}
