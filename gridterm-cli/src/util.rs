//! Shared utility functions used across command modules.

use std::path::Path;

use gridterm_core::{ConfigManager, ProjectId, Workspace};

use crate::error::CliError;

/// Creates a `ConfigManager` using the optional custom config directory
/// from CLI args.
pub fn create_config_manager(config_path: Option<&Path>) -> Result<ConfigManager, CliError> {
    match config_path {
        Some(path) => Ok(ConfigManager::with_config_dir(path.to_path_buf())),
        None => ConfigManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}"))),
    }
}

/// Loads the saved workspace.
pub fn load_workspace(config_manager: &ConfigManager) -> Result<Workspace, CliError> {
    let state = config_manager
        .load_state()
        .map_err(|e| CliError::Config(format!("Failed to load projects: {e}")))?;
    Ok(Workspace::from_state(state))
}

/// Saves the workspace.
pub fn save_workspace(
    config_manager: &ConfigManager,
    workspace: &Workspace,
) -> Result<(), CliError> {
    config_manager
        .save_state(&workspace.to_state())
        .map_err(|e| CliError::Config(format!("Failed to save projects: {e}")))
}

/// Find a project by name or UUID
pub fn find_project(workspace: &Workspace, name_or_id: &str) -> Result<ProjectId, CliError> {
    Ok(workspace.store().find(name_or_id)?.id)
}

/// Formats pane indices as `0, 2, 3`, or `-` when there are none.
pub fn format_indices(indices: &[usize]) -> String {
    if indices.is_empty() {
        return "-".to_string();
    }
    indices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
