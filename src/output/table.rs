//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, Width, object::Rows},
};

/// Shown instead of an empty table
pub const EMPTY_MESSAGE: &str = "No repositories found.";

/// Widest a single cell may grow before wrapping
const MAX_CELL_WIDTH: usize = 60;

/// Format rows as a rounded table; long cells wrap rather than truncate
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .with(Modify::new(Rows::new(1..)).with(Width::wrap(MAX_CELL_WIDTH).keep_words(true)));

    table.to_string()
}
