//! Project status command.

use std::fmt::Write as _;
use std::path::Path;

use gridterm_core::{Project, Workspace};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::util::{create_config_manager, find_project, format_indices, load_workspace};

/// Status command handler
pub fn cmd_status(
    config_path: Option<&Path>,
    project: Option<&str>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config_manager = create_config_manager(config_path)?;
    let workspace = load_workspace(&config_manager)?;

    let projects: Vec<&Project> = match project {
        Some(name) => vec![workspace.project(find_project(&workspace, name)?)?],
        None => workspace.projects().iter().collect(),
    };

    match format {
        OutputFormat::Table => {
            if projects.is_empty() {
                println!("No projects found.");
            }
            for (i, project) in projects.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("{}", format_status(&workspace, project));
            }
        }
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = projects
                .iter()
                .map(|project| {
                    serde_json::json!({
                        "id": project.id,
                        "name": project.name,
                        "root_path": project.root_path,
                        "layout": project.layout_id,
                        "pane_count": project.layout().pane_count,
                        "active": workspace.active_project().map(|p| p.id) == Some(project.id),
                        "closed": workspace.closed_indices(project.id),
                    })
                })
                .collect();
            let json = serde_json::to_string_pretty(&entries)
                .map_err(|e| CliError::Config(format!("Failed to serialize status: {e}")))?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Formats one project with a map of its grid.
///
/// Open panes show their index, closed panes an `x`.
#[must_use]
pub fn format_status(workspace: &Workspace, project: &Project) -> String {
    let def = project.layout();
    let active = workspace.active_project().map(|p| p.id) == Some(project.id);
    let closed = workspace.closed_indices(project.id);

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{}{} - {} ({})",
        project.name,
        if active { " [active]" } else { "" },
        def.label,
        def.id
    );
    let _ = writeln!(output, "Root: {}", project.root_path.display());

    let width = def.pane_count.saturating_sub(1).to_string().len();
    for row in 0..usize::from(def.geometry.rows) {
        let columns = usize::from(def.geometry.columns);
        let cells: Vec<String> = (row * columns..(row + 1) * columns)
            .map(|index| {
                if workspace.is_pane_closed(project.id, index) {
                    format!("[{:>width$}]", "x")
                } else {
                    format!("[{index:>width$}]")
                }
            })
            .collect();
        let _ = writeln!(output, "  {}", cells.join(" "));
    }
    let _ = write!(output, "Closed: {}", format_indices(&closed));
    output
}
