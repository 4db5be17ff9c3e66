//! Configuration management for gridterm
//!
//! This module provides the `ConfigManager` for loading and saving the
//! TOML settings file and the saved project state.

mod manager;
pub mod settings;

pub use manager::{CONFIG_DIR_ENV, ConfigManager, SETTINGS_FILE};
pub use settings::{GridSettings, LoggingSettings, SessionSettings, Settings, ShellSettings};
