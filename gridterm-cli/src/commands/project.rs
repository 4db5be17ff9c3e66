//! Project management commands.

use std::fmt::Write as _;
use std::path::Path;

use gridterm_core::{Project, Workspace};

use crate::cli::{OutputFormat, ProjectCommands};
use crate::error::CliError;
use crate::util::{
    create_config_manager, find_project, format_indices, load_workspace, save_workspace,
};

/// Project command handler
pub fn cmd_project(config_path: Option<&Path>, subcmd: ProjectCommands) -> Result<(), CliError> {
    let config_manager = create_config_manager(config_path)?;
    let mut workspace = load_workspace(&config_manager)?;

    match subcmd {
        ProjectCommands::List { format } => {
            match format {
                OutputFormat::Table => println!("{}", format_table(&workspace)),
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(workspace.projects()).map_err(|e| {
                        CliError::Config(format!("Failed to serialize projects: {e}"))
                    })?;
                    println!("{json}");
                }
            }
            return Ok(());
        }
        ProjectCommands::Add { path, name, layout } => {
            let layout_id = match layout {
                Some(layout_id) => layout_id,
                None => config_manager.load_settings()?.grid.default_layout,
            };
            let root = std::path::absolute(&path).unwrap_or(path);
            let mut project = Project::from_root(root, layout_id);
            if let Some(name) = name {
                project.name = name;
            }
            let name = project.name.clone();
            let id = workspace.add_project(project)?;
            println!("Added project '{name}' ({layout_id}) with ID {id}");
        }
        ProjectCommands::Remove { project } => {
            let id = find_project(&workspace, &project)?;
            let removed = workspace.remove_project(id)?;
            println!("Removed project '{}'", removed.name);
        }
        ProjectCommands::Activate { project } => {
            let id = find_project(&workspace, &project)?;
            workspace.set_active_project(id)?;
            println!("Project '{}' is now active", workspace.project(id)?.name);
        }
    }

    save_workspace(&config_manager, &workspace)
}

/// Format projects as a table string
#[must_use]
pub fn format_table(workspace: &Workspace) -> String {
    let projects = workspace.projects();
    if projects.is_empty() {
        return "No projects found.".to_string();
    }
    let active = workspace.active_project().map(|p| p.id);

    let name_width = projects
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    let _ = writeln!(
        output,
        "  {:<name_width$}  {:<12}  {:<6}  {:<10}  ROOT",
        "NAME", "LAYOUT", "PANES", "CLOSED"
    );
    for project in projects {
        let marker = if Some(project.id) == active { '*' } else { ' ' };
        let closed = format_indices(&workspace.closed_indices(project.id));
        let _ = writeln!(
            output,
            "{marker} {:<name_width$}  {:<12}  {:<6}  {:<10}  {}",
            project.name,
            project.layout_id.as_str(),
            project.layout().pane_count,
            closed,
            project.root_path.display()
        );
    }
    output.trim_end().to_string()
}
