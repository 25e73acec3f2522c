//! Post-hoc detection of work the allocator could not place.
//!
//! The engine has no partial-failure channel. Callers that want to tell the
//! user about unscheduled hours compare a finished grid with the tasks that
//! produced it.

use serde::{Deserialize, Serialize};

use super::{RemainingWork, ScheduleGrid};
use crate::task::Task;

const HOUR_EPSILON: f64 = 1e-6;

/// Work left over for one task after allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortfall {
    pub task_id: String,
    pub task_name: String,
    pub required_hours: f64,
    pub assigned_hours: f64,
    pub unscheduled_hours: f64,
}

/// Tasks whose remaining work exceeds the hours the grid gave them, in input order.
///
/// `remaining` must match the mode the grid was built with.
pub fn shortfalls(grid: &ScheduleGrid, tasks: &[Task], remaining: RemainingWork) -> Vec<Shortfall> {
    tasks
        .iter()
        .filter_map(|task| {
            let required_hours = remaining.hours(task);
            if required_hours <= HOUR_EPSILON {
                return None;
            }
            let assigned_hours = grid.assigned_hours(&task.id);
            let unscheduled_hours = required_hours - assigned_hours;
            (unscheduled_hours > HOUR_EPSILON).then(|| Shortfall {
                task_id: task.id.clone(),
                task_name: task.name.clone(),
                required_hours,
                assigned_hours,
                unscheduled_hours,
            })
        })
        .collect()
}
