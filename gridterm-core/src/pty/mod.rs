//! Local PTY backend
//!
//! [`NativePtyBackend`] implements [`PtyBackend`](crate::session::PtyBackend)
//! with `portable-pty`. Each pane's shell is started as a login shell with
//! a terminal-friendly environment; variables that make tools think they
//! run under CI or inside an IDE are stripped.

mod native;
mod output;
mod shell;

pub use native::NativePtyBackend;
pub use output::utf8_boundary;
pub use shell::{
    CI_ENV_DENYLIST, FALLBACK_SHELL, IDE_ENV_PREFIX_DENYLIST, ShellConfig, default_shell,
    is_denied_env,
};
