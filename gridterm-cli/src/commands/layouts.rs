//! List layouts command.

use std::fmt::Write as _;

use gridterm_core::{LayoutDef, all_layouts};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// List layouts command handler
pub fn cmd_layouts(format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Table => println!("{}", format_table(all_layouts())),
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = all_layouts()
                .iter()
                .map(|def| {
                    serde_json::json!({
                        "id": def.id,
                        "label": def.label,
                        "columns": def.geometry.columns,
                        "rows": def.geometry.rows,
                        "panes": def.pane_count,
                    })
                })
                .collect();
            let json = serde_json::to_string_pretty(&entries)
                .map_err(|e| CliError::Config(format!("Failed to serialize layouts: {e}")))?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Format layouts as a table string
#[must_use]
pub fn format_table(layouts: &[LayoutDef]) -> String {
    let id_width = layouts
        .iter()
        .map(|d| d.id.as_str().len())
        .max()
        .unwrap_or(2)
        .max(2);
    let label_width = layouts
        .iter()
        .map(|d| d.label.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:<id_width$}  {:<label_width$}  {:<5}  PANES",
        "ID", "LABEL", "GRID"
    );
    for def in layouts {
        let _ = writeln!(
            output,
            "{:<id_width$}  {:<label_width$}  {:<5}  {}",
            def.id.as_str(),
            def.label,
            def.geometry.to_string(),
            def.pane_count
        );
    }
    output.trim_end().to_string()
}
