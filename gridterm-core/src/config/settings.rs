//! Application settings
//!
//! Serialized as TOML. Every field has a default, so a partial file (or no
//! file at all) yields a complete configuration.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::layout::LayoutId;
use crate::pty::{ShellConfig, default_shell};
use crate::session::{
    DEFAULT_INITIAL_PROBE_DELAY_MS, DEFAULT_PROBE_RETRY_INTERVAL_MS, DEFAULT_RESIZE_DEBOUNCE_MS,
    DEFAULT_STABILITY_SAMPLE_DELAY_MS, SessionTiming,
};
use crate::tracing::{TracingConfig, TracingLevel, TracingOutput};

/// All settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Session lifecycle timing
    pub session: SessionSettings,
    /// Shell launch
    pub shell: ShellSettings,
    /// Grid defaults
    pub grid: GridSettings,
    /// Logging
    pub logging: LoggingSettings,
}

impl Settings {
    /// Checks values that parse but cannot work.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.session.probe_retry_interval_ms == 0 {
            return Err(ConfigError::Validation {
                field: "session.probe_retry_interval_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.shell.args.iter().any(String::is_empty) {
            return Err(ConfigError::Validation {
                field: "shell.args".to_string(),
                reason: "arguments must not be empty".to_string(),
            });
        }
        if self.shell.term.is_empty() {
            return Err(ConfigError::Validation {
                field: "shell.term".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Timing of the session lifecycle, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Delay before the first dimension probe
    pub initial_probe_delay_ms: u64,
    /// Interval between dimension probes
    pub probe_retry_interval_ms: u64,
    /// Quiet period that ends a burst of geometry changes
    pub resize_debounce_ms: u64,
    /// Gap between the two samples of the stability check
    pub stability_sample_delay_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            initial_probe_delay_ms: DEFAULT_INITIAL_PROBE_DELAY_MS,
            probe_retry_interval_ms: DEFAULT_PROBE_RETRY_INTERVAL_MS,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            stability_sample_delay_ms: DEFAULT_STABILITY_SAMPLE_DELAY_MS,
        }
    }
}

impl SessionSettings {
    /// Timing for session controllers.
    #[must_use]
    pub const fn timing(&self) -> SessionTiming {
        SessionTiming {
            initial_probe_delay: Duration::from_millis(self.initial_probe_delay_ms),
            probe_retry_interval: Duration::from_millis(self.probe_retry_interval_ms),
            resize_debounce: Duration::from_millis(self.resize_debounce_ms),
            stability_sample_delay: Duration::from_millis(self.stability_sample_delay_ms),
        }
    }
}

/// How pane shells are launched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellSettings {
    /// Shell executable; `$SHELL` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    /// Shell arguments
    pub args: Vec<String>,
    /// Value of `TERM`
    pub term: String,
    /// Value of `TERM_PROGRAM`
    pub term_program: String,
    /// Strip CI and IDE variables inherited from the host
    pub sanitize_env: bool,
    /// Extra environment variables
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl Default for ShellSettings {
    fn default() -> Self {
        let shell = ShellConfig::default();
        Self {
            program: None,
            args: shell.args,
            term: shell.term,
            term_program: shell.term_program,
            sanitize_env: shell.sanitize_env,
            env: BTreeMap::new(),
        }
    }
}

impl ShellSettings {
    /// Resolves the launch configuration. A leading `~` in the program path
    /// is expanded.
    #[must_use]
    pub fn shell_config(&self) -> ShellConfig {
        let program = self
            .program
            .as_deref()
            .filter(|p| !p.is_empty())
            .map_or_else(default_shell, |p| {
                PathBuf::from(shellexpand::tilde(p).into_owned())
            });
        ShellConfig {
            program,
            args: self.args.clone(),
            term: self.term.clone(),
            term_program: self.term_program.clone(),
            env: self.env.clone(),
            sanitize_env: self.sanitize_env,
        }
    }
}

/// Grid defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Layout of newly added projects
    pub default_layout: LayoutId,
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: TracingLevel,
    /// Log file; stderr when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl LoggingSettings {
    /// Tracing configuration for these settings.
    #[must_use]
    pub fn tracing_config(&self) -> TracingConfig {
        let output = self.file.as_ref().map_or(TracingOutput::Stderr, |file| {
            TracingOutput::File(PathBuf::from(
                shellexpand::tilde(&file.to_string_lossy()).into_owned(),
            ))
        });
        TracingConfig::new()
            .with_level(self.level)
            .with_output(output)
    }
}
