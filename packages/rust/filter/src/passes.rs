//! Cell-level passes applied by the hide-code filter.
//!
//! Each pass inspects or mutates a single cell and reports whether it
//! changed anything, so the caller can keep counts.

use hidecode_shared::{Cell, CellType};
use serde_json::Value;

/// Key holding the prompt number on code cells and `execute_result` outputs.
const EXECUTION_COUNT: &str = "execution_count";

// ---------------------------------------------------------------------------
// Pass 1: Blank hidden source
// ---------------------------------------------------------------------------

/// Clear the source of a non-markdown cell whose `key` flag is truthy.
///
/// Returns `true` when text was removed.
pub(crate) fn blank_hidden_source(cell: &mut Cell, key: &str) -> bool {
    if cell.cell_type == CellType::Markdown || !cell.metadata_flag(key) {
        return false;
    }

    let had_text = !cell.source.is_empty();
    cell.source.clear();
    had_text
}

// ---------------------------------------------------------------------------
// Pass 2: Clear hidden prompts
// ---------------------------------------------------------------------------

/// Null out the prompt numbers of a non-markdown cell whose `key` flag is truthy.
///
/// Touches the cell's own `execution_count` and that of every output that
/// carries one. Returns `true` when any non-null count was cleared.
pub(crate) fn clear_hidden_prompt(cell: &mut Cell, key: &str) -> bool {
    if cell.cell_type == CellType::Markdown || !cell.metadata_flag(key) {
        return false;
    }

    let mut cleared = null_out(cell.extra.get_mut(EXECUTION_COUNT));

    for output in cell.outputs.iter_mut().flatten() {
        if let Value::Object(fields) = output {
            cleared |= null_out(fields.get_mut(EXECUTION_COUNT));
        }
    }

    cleared
}

fn null_out(slot: Option<&mut Value>) -> bool {
    match slot {
        Some(value) if !value.is_null() => {
            *value = Value::Null;
            true
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Pass 3: Drop empty code cells
// ---------------------------------------------------------------------------

/// A code cell with no source and no recorded outputs.
///
/// Markdown and raw cells are never considered empty.
pub fn is_empty_code_cell(cell: &Cell) -> bool {
    cell.cell_type == CellType::Code && cell.source.is_empty() && cell.output_count() == 0
}

/// Remove empty code cells in place, keeping the order of the rest.
///
/// Returns the number of cells removed.
pub(crate) fn drop_empty_code_cells(cells: &mut Vec<Cell>) -> usize {
    let before = cells.len();
    cells.retain(|cell| !is_empty_code_cell(cell));
    before - cells.len()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
