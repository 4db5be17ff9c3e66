//! Command handler modules for the CLI.

mod layout;
mod layouts;
mod pane;
mod project;
mod run;
mod status;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(config_path: Option<&Path>, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Layouts { format } => layouts::cmd_layouts(format),
        Commands::Project(subcmd) => project::cmd_project(config_path, subcmd),
        Commands::Layout {
            project,
            layout,
            close,
            yes,
        } => layout::cmd_layout(config_path, &project, layout, &close, yes),
        Commands::Pane(subcmd) => pane::cmd_pane(config_path, subcmd),
        Commands::Status { project, format } => {
            status::cmd_status(config_path, project.as_deref(), format)
        }
        Commands::Run {
            project,
            pane,
            cols,
            rows,
            command,
            send,
            timeout_secs,
        } => run::cmd_run(
            config_path,
            run::RunParams {
                project: &project,
                pane,
                cols,
                rows,
                command: command.as_deref(),
                send: send.as_deref(),
                timeout_secs,
            },
        ),
    }
}
