//! Pane host
//!
//! Keeps exactly one [`SessionController`] per live pane. The set of live
//! panes comes from the workspace: every pane of every project that is not
//! closed. Panes of inactive projects stay mounted so their sessions
//! survive project switches.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::tracing::span_names;

use super::backend::PtyBackend;
use super::controller::SessionController;
use super::error::{SessionError, SessionResult};
use super::surface::RenderSurface;
use super::types::{PaneKey, PaneStatus, SessionTiming};

/// A pane that should have a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivePane {
    /// Pane identity
    pub key: PaneKey,
    /// Working directory for the pane's shell
    pub working_directory: Option<PathBuf>,
}

/// Outcome of a reconcile pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Panes that got a new controller
    pub mounted: Vec<PaneKey>,
    /// Panes whose controller was torn down
    pub disposed: Vec<PaneKey>,
}

impl Reconciled {
    /// Returns true if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty() && self.disposed.is_empty()
    }
}

/// Owns the session controllers of all live panes.
pub struct PaneHost {
    backend: Arc<dyn PtyBackend>,
    timing: SessionTiming,
    controllers: BTreeMap<PaneKey, SessionController>,
}

impl PaneHost {
    /// Creates an empty host.
    #[must_use]
    pub fn new(backend: Arc<dyn PtyBackend>, timing: SessionTiming) -> Self {
        Self {
            backend,
            timing,
            controllers: BTreeMap::new(),
        }
    }

    /// Brings the mounted controllers in line with `desired`.
    ///
    /// Controllers of panes no longer desired are disposed first, then new
    /// panes are mounted with a surface from `make_surface`. Panes that
    /// stay live keep their controller untouched.
    pub fn reconcile<F>(
        &mut self,
        desired: &[LivePane],
        now: Instant,
        mut make_surface: F,
    ) -> Reconciled
    where
        F: FnMut(&PaneKey) -> Box<dyn RenderSurface>,
    {
        let _span = tracing::debug_span!(span_names::PANES_RECONCILE).entered();
        let wanted: BTreeSet<PaneKey> = desired.iter().map(|pane| pane.key).collect();
        let mut result = Reconciled::default();

        let stale: Vec<PaneKey> = self
            .controllers
            .keys()
            .filter(|key| !wanted.contains(key))
            .copied()
            .collect();
        for key in stale {
            if let Some(mut controller) = self.controllers.remove(&key) {
                controller.dispose();
                result.disposed.push(key);
            }
        }

        for pane in desired {
            if self.controllers.contains_key(&pane.key) {
                continue;
            }
            let mut controller = SessionController::new(
                pane.key.session_id(),
                pane.working_directory.clone(),
                Arc::clone(&self.backend),
                make_surface(&pane.key),
                self.timing,
            );
            controller.mount(now);
            self.controllers.insert(pane.key, controller);
            result.mounted.push(pane.key);
        }

        if !result.is_empty() {
            tracing::debug!(
                mounted = result.mounted.len(),
                disposed = result.disposed.len(),
                live = self.controllers.len(),
                "Reconciled panes"
            );
        }
        result
    }

    /// Polls every controller.
    pub fn poll(&mut self, now: Instant) {
        for controller in self.controllers.values_mut() {
            controller.poll(now);
        }
    }

    /// Earliest timer deadline across all controllers.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.controllers
            .values()
            .filter_map(SessionController::next_deadline)
            .min()
    }

    /// Returns the controller of a pane.
    #[must_use]
    pub fn get(&self, key: &PaneKey) -> Option<&SessionController> {
        self.controllers.get(key)
    }

    /// Returns the controller of a pane mutably.
    pub fn get_mut(&mut self, key: &PaneKey) -> Option<&mut SessionController> {
        self.controllers.get_mut(key)
    }

    /// Number of mounted panes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Returns true if no pane is mounted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Keys of all mounted panes, in order.
    pub fn keys(&self) -> impl Iterator<Item = &PaneKey> {
        self.controllers.keys()
    }

    /// Status of every mounted pane.
    #[must_use]
    pub fn statuses(&self) -> Vec<(PaneKey, PaneStatus)> {
        self.controllers
            .iter()
            .map(|(key, controller)| (*key, controller.status()))
            .collect()
    }

    /// Forwards input to a pane. Returns whether the input was accepted.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::PaneNotMounted` if the pane has no controller.
    pub fn send_input(&mut self, key: &PaneKey, data: &[u8]) -> SessionResult<bool> {
        Ok(self.controller_mut(key)?.send_input(data))
    }

    /// Reports a geometry change for one pane.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::PaneNotMounted` if the pane has no controller.
    pub fn notify_geometry_changed(&mut self, key: &PaneKey, now: Instant) -> SessionResult<()> {
        self.controller_mut(key)?.notify_geometry_changed(now);
        Ok(())
    }

    /// Reports a geometry change for every pane, e.g. after a window resize.
    pub fn notify_all_geometry_changed(&mut self, now: Instant) {
        for controller in self.controllers.values_mut() {
            controller.notify_geometry_changed(now);
        }
    }

    /// Retries a failed pane start.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::PaneNotMounted` if the pane has no controller,
    /// or `SessionError::NotRetryable` if its start has not failed.
    pub fn retry_start(&mut self, key: &PaneKey, now: Instant) -> SessionResult<()> {
        self.controller_mut(key)?.retry_start(now)
    }

    /// Tears down every pane.
    pub fn dispose_all(&mut self) {
        let count = self.controllers.len();
        for (_, mut controller) in std::mem::take(&mut self.controllers) {
            controller.dispose();
        }
        if count > 0 {
            tracing::debug!(count, "Disposed all panes");
        }
    }

    fn controller_mut(&mut self, key: &PaneKey) -> SessionResult<&mut SessionController> {
        self.controllers
            .get_mut(key)
            .ok_or(SessionError::PaneNotMounted(*key))
    }
}

impl std::fmt::Debug for PaneHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaneHost")
            .field("timing", &self.timing)
            .field("controllers", &self.controllers)
            .finish_non_exhaustive()
    }
}
