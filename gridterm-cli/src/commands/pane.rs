//! Pane close/reopen commands.

use std::path::Path;

use crate::cli::PaneCommands;
use crate::error::CliError;
use crate::util::{create_config_manager, find_project, load_workspace, save_workspace};

/// Pane command handler
pub fn cmd_pane(config_path: Option<&Path>, subcmd: PaneCommands) -> Result<(), CliError> {
    let config_manager = create_config_manager(config_path)?;
    let mut workspace = load_workspace(&config_manager)?;

    match subcmd {
        PaneCommands::Close { project, index } => {
            let id = find_project(&workspace, &project)?;
            if workspace.close_pane(id, index)? {
                println!("Closed pane {index} of '{project}'");
            } else {
                println!("Pane {index} of '{project}' is already closed");
                return Ok(());
            }
        }
        PaneCommands::Reopen { project, index } => {
            let id = find_project(&workspace, &project)?;
            if workspace.reopen_pane(id, index)? {
                println!("Reopened pane {index} of '{project}'");
            } else {
                println!("Pane {index} of '{project}' is not closed");
                return Ok(());
            }
        }
    }

    save_workspace(&config_manager, &workspace)
}
