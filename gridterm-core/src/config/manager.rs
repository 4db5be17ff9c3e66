//! Configuration directory management

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::persistence::{PROJECT_STATE_FILE, ProjectState};
use crate::tracing::span_names;

use super::settings::Settings;

/// Environment variable that overrides the configuration directory
pub const CONFIG_DIR_ENV: &str = "GRIDTERM_CONFIG_DIR";

/// Settings file name inside the configuration directory
pub const SETTINGS_FILE: &str = "config.toml";

/// Loads and saves the files in gridterm's configuration directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Uses `$GRIDTERM_CONFIG_DIR`, or `gridterm` under the user's
    /// configuration directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if neither is available.
    pub fn new() -> ConfigResult<Self> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            let dir = PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).into_owned());
            return Ok(Self::with_config_dir(dir));
        }
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_config_dir(base.join("gridterm")))
    }

    /// Uses an explicit configuration directory.
    #[must_use]
    pub const fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// The configuration directory.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of the settings file.
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    /// Path of the saved project state.
    #[must_use]
    pub fn state_path(&self) -> PathBuf {
        self.config_dir.join(PROJECT_STATE_FILE)
    }

    /// Loads settings; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML or unknown values,
    /// `ConfigError::Validation` for unusable values, and
    /// `ConfigError::Io` if the file exists but cannot be read.
    pub fn load_settings(&self) -> ConfigResult<Settings> {
        let path = self.settings_path();
        let _span =
            tracing::debug_span!(span_names::CONFIG_LOAD, path = %path.display()).entered();
        let Some(text) = read_optional(&path)? else {
            tracing::debug!("No settings file, using defaults");
            return Ok(Settings::default());
        };
        let settings: Settings = toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Writes settings, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn save_settings(&self, settings: &Settings) -> ConfigResult<()> {
        let text =
            toml::to_string_pretty(settings).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        self.write_file(&self.settings_path(), &text)
    }

    /// Loads the saved project state; a missing file yields an empty state.
    ///
    /// The returned state is not yet repaired; `Workspace::from_state` does
    /// that.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON or unknown layout
    /// ids, and `ConfigError::Io` if the file cannot be read.
    pub fn load_state(&self) -> ConfigResult<ProjectState> {
        let path = self.state_path();
        let _span =
            tracing::debug_span!(span_names::CONFIG_LOAD, path = %path.display()).entered();
        let Some(text) = read_optional(&path)? else {
            return Ok(ProjectState::new());
        };
        ProjectState::from_json(&text).map_err(|e| ConfigError::Parse {
            path,
            message: e.to_string(),
        })
    }

    /// Writes the project state, stamping it with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn save_state(&self, state: &ProjectState) -> ConfigResult<()> {
        let mut state = state.clone();
        state.touch();
        let json = state
            .to_json()
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        self.write_file(&self.state_path(), &json)
    }

    fn write_file(&self, path: &Path, contents: &str) -> ConfigResult<()> {
        let _span =
            tracing::debug_span!(span_names::CONFIG_SAVE, path = %path.display()).entered();
        fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::Io {
            path: self.config_dir.clone(),
            source,
        })?;
        // Write to a sibling and rename so a crash never leaves a torn file.
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, contents).map_err(|source| ConfigError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Saved");
        Ok(())
    }
}

fn read_optional(path: &Path) -> ConfigResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
