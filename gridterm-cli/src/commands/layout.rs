//! Layout change command.

use std::path::Path;

use gridterm_core::{LayoutChange, LayoutId, PendingTransition};

use crate::error::CliError;
use crate::util::{
    create_config_manager, find_project, format_indices, load_workspace, save_workspace,
};

/// Layout change command handler
///
/// A shrink is only applied with `yes`; otherwise the pending transition
/// and the panes that would close are printed and nothing changes.
pub fn cmd_layout(
    config_path: Option<&Path>,
    project: &str,
    layout_id: LayoutId,
    close: &[usize],
    yes: bool,
) -> Result<(), CliError> {
    let config_manager = create_config_manager(config_path)?;
    let mut workspace = load_workspace(&config_manager)?;
    let id = find_project(&workspace, project)?;
    let name = workspace.project(id)?.name.clone();

    let pending = match workspace.request_layout_change(id, layout_id)? {
        LayoutChange::Committed(committed) => {
            if !close.is_empty() {
                return Err(CliError::Grid(format!(
                    "--close only applies when the grid shrinks; '{name}' grows from {} to {}",
                    committed.from_layout, committed.to_layout
                )));
            }
            save_workspace(&config_manager, &workspace)?;
            println!(
                "Layout of '{name}' changed from {} to {}",
                committed.from_layout, committed.to_layout
            );
            return Ok(());
        }
        LayoutChange::Pending(pending) => pending,
    };

    let selection = if close.is_empty() {
        pending.default_selection()
    } else {
        close.to_vec()
    };

    if !yes {
        print_pending(&name, &pending, &selection);
        return Ok(());
    }

    let committed = workspace.confirm_transition(id, &selection)?;
    save_workspace(&config_manager, &workspace)?;
    println!(
        "Layout of '{name}' changed from {} to {}; closed panes: {}",
        committed.from_layout,
        committed.to_layout,
        format_indices(&committed.newly_closed)
    );
    Ok(())
}

fn print_pending(name: &str, pending: &PendingTransition, selection: &[usize]) {
    println!(
        "Switching '{name}' from {} ({} panes) to {} ({} panes) closes {} pane(s).",
        pending.from_layout,
        pending.from_count,
        pending.to_label,
        pending.to_count,
        pending.deficit()
    );
    println!("Panes to close: {}", format_indices(selection));
    println!("Layout unchanged. Re-run with --yes to confirm, or pick panes with --close.");
}
