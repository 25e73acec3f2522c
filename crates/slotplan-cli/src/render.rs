//! Plain-text rendering of a schedule grid.
//!
//! Rows are slots labelled by clock time, columns are dates.

use slotplan_core::{ScheduleGrid, Shortfall, Slot};

const FIXED_CELL: &str = "[fixed]";
const EMPTY_CELL: &str = "-";

fn cell(slot: &Slot) -> &str {
    if slot.fixed {
        FIXED_CELL
    } else if slot.task_id.is_some() {
        &slot.task_name
    } else {
        EMPTY_CELL
    }
}

/// Render the grid as an aligned table, one line per slot.
pub fn grid_table(grid: &ScheduleGrid) -> String {
    if grid.days.is_empty() || grid.slots_per_day() == 0 {
        return "no schedule slots\n".to_string();
    }

    let mut columns: Vec<Vec<String>> = Vec::with_capacity(grid.days.len() + 1);

    let mut labels = vec!["Time".to_string()];
    labels.extend((0..grid.slots_per_day()).map(|i| grid.slot_clock(i).to_string()));
    columns.push(labels);

    for day in &grid.days {
        let mut col = vec![day.date.format("%m/%d (%a)").to_string()];
        col.extend(day.slots.iter().map(|s| cell(s).to_string()));
        columns.push(col);
    }

    let widths: Vec<usize> = columns
        .iter()
        .map(|col| col.iter().map(|c| c.chars().count()).max().unwrap_or(0))
        .collect();

    let rows = grid.slots_per_day() + 1;
    let mut out = String::new();
    for row in 0..rows {
        let line: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(col, width)| format!("{:<width$}", col[row], width = *width))
            .collect();
        out.push_str(line.join(" | ").trim_end());
        out.push('\n');
    }
    out
}

/// One human-readable line per task with unscheduled work.
pub fn shortfall_lines(shortfalls: &[Shortfall]) -> Vec<String> {
    shortfalls
        .iter()
        .map(|s| {
            format!(
                "unscheduled: {} ({}) {:.2}h of {:.2}h",
                s.task_name, s.task_id, s.unscheduled_hours, s.required_hours
            )
        })
        .collect()
}
