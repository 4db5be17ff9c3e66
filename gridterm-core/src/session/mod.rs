//! Pane sessions
//!
//! Each live pane owns one PTY session. [`SessionController`] drives a
//! single session through its lifecycle; [`PaneHost`] keeps one controller
//! per live pane. The PTY itself sits behind the [`PtyBackend`] trait and
//! the terminal screen behind [`RenderSurface`].

mod backend;
mod controller;
mod error;
mod host;
mod surface;
mod types;

pub use backend::{
    BackendError, BackendResult, CreateAck, CreateRequest, OutputSink, PtyBackend,
};
pub(crate) use backend::CreateChannels;
pub use controller::SessionController;
pub use error::{SessionError, SessionResult};
pub use host::{LivePane, PaneHost, Reconciled};
pub use surface::{RenderSurface, WriterSurface};
pub use types::{
    DEFAULT_INITIAL_PROBE_DELAY_MS, DEFAULT_PROBE_RETRY_INTERVAL_MS, DEFAULT_RESIZE_DEBOUNCE_MS,
    DEFAULT_STABILITY_SAMPLE_DELAY_MS, Dimensions, PaneKey, PaneStatus, SessionId, SessionPhase,
    SessionTiming,
};
