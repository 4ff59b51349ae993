use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::buddy::{Execution, ExecutionStatus};
use crate::config::Config;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn key_cell(label: &str) -> Cell {
    Cell::new(label).fg(TableColor::Cyan)
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => Cell::new("(not set)").fg(TableColor::DarkGrey),
    }
}

pub fn status_cell(status: &ExecutionStatus) -> Cell {
    let cell = Cell::new(status.as_str());
    match status {
        ExecutionStatus::Successful => cell.fg(TableColor::Green),
        ExecutionStatus::Failed => cell.fg(TableColor::Red),
        s if s.is_pending() => cell.fg(TableColor::Yellow),
        _ => cell.fg(TableColor::DarkGrey),
    }
}

/// Current configuration, with the token masked.
pub fn config_table(config: &Config) -> Table {
    let mut table = create_table();
    let token = (!config.token.is_empty()).then(|| config.token().masked());
    let workspace = (!config.workspace.is_empty()).then_some(config.workspace.as_str());

    table.add_row(vec![key_cell("Token"), optional_cell(token.as_deref())]);
    table.add_row(vec![key_cell("Workspace"), optional_cell(workspace)]);
    table.add_row(vec![
        key_cell("Protected branch"),
        optional_cell(config.protected_branch()),
    ]);
    table.add_row(vec![
        key_cell("Protected pipeline"),
        optional_cell(config.protected_pipeline()),
    ]);
    table
}

pub fn execution_table(execution: &Execution) -> Table {
    let mut table = create_table();
    let date = |d: Option<chrono::DateTime<chrono::Utc>>| {
        d.map(|d| d.format("%Y-%m-%d %H:%M:%S UTC").to_string())
    };

    table.add_row(vec![key_cell("Execution"), Cell::new(execution.id)]);
    table.add_row(vec![key_cell("Status"), status_cell(&execution.status)]);
    table.add_row(vec![
        key_cell("Branch"),
        optional_cell(execution.branch.as_ref().map(|b| b.name.as_str())),
    ]);
    table.add_row(vec![
        key_cell("Started"),
        optional_cell(date(execution.start_date).as_deref()),
    ]);
    table.add_row(vec![
        key_cell("Finished"),
        optional_cell(date(execution.finish_date).as_deref()),
    ]);
    table.add_row(vec![
        key_cell("Triggered by"),
        optional_cell(execution.creator.as_ref().map(|c| c.name.as_str())),
    ]);
    table.add_row(vec![
        key_cell("URL"),
        optional_cell((!execution.html_url.is_empty()).then_some(execution.html_url.as_str())),
    ]);
    table
}
