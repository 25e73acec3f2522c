//! Slot allocation engine.
//!
//! This module turns settings and a task snapshot into a [`ScheduleGrid`]:
//! - Builds a fixed-length horizon starting at the current week
//! - Splits each day into equal slots
//! - Optionally blocks slots covered by fixed commitments
//! - Assigns tasks greedily, in priority order, to the first free slots on
//!   or before each task's due date
//!
//! Allocation is first-fit with no backtracking. A task that cannot be fully
//! placed simply keeps its remainder; see [`shortfalls`] to inspect it.

mod grid;
pub mod horizon;
mod shortfall;

pub use grid::{Day, ScheduleGrid, Slot};
pub use shortfall::{shortfalls, Shortfall};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;
use crate::schedule::{ClockTime, Settings, MINUTES_PER_DAY};
use crate::task::Task;

/// Remaining work below this many minutes counts as done.
const MINUTE_EPSILON: f64 = 1e-6;

/// How a task's outstanding work is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainingWork {
    /// `required_hours * (1 - progress / 100)`
    #[default]
    ProgressDiscounted,
    /// `required_hours`, ignoring progress.
    RawRequired,
}

impl RemainingWork {
    pub fn hours(&self, task: &Task) -> f64 {
        match self {
            RemainingWork::ProgressDiscounted => task.discounted_hours(),
            RemainingWork::RawRequired => task.required_hours,
        }
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Number of consecutive days planned, starting at the week anchor
    pub horizon_days: u32,
    /// Block slots covered by fixed commitments
    pub exclude_fixed: bool,
    /// Remaining-work formula
    pub remaining: RemainingWork,
}

impl SchedulerConfig {
    pub const TASK_LEVEL_HORIZON_DAYS: u32 = 14;
    pub const HOURLY_HORIZON_DAYS: u32 = 7;

    /// Two-week plan over net daily hours, discounted by progress.
    pub fn task_level() -> Self {
        Self {
            horizon_days: Self::TASK_LEVEL_HORIZON_DAYS,
            exclude_fixed: false,
            remaining: RemainingWork::ProgressDiscounted,
        }
    }

    /// One-week wake-to-bed plan that honours fixed commitments.
    pub fn hourly() -> Self {
        Self {
            horizon_days: Self::HOURLY_HORIZON_DAYS,
            exclude_fixed: true,
            remaining: RemainingWork::RawRequired,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::task_level()
    }
}

/// Deterministic greedy slot allocator
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    /// Create a new scheduler with default config
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Build a fresh grid for the week containing `anchor`.
    ///
    /// # Arguments
    /// * `settings` - Slot granularity, daily window and fixed commitments
    /// * `tasks` - Task snapshot; never mutated
    /// * `anchor` - Any date in the first week of the horizon (usually today)
    ///
    /// # Errors
    /// Returns [`SchedulerError::InvalidConfig`] when the slot size, daily
    /// capacity or horizon length cannot produce a grid.
    pub fn build_grid(
        &self,
        settings: &Settings,
        tasks: &[Task],
        anchor: NaiveDate,
    ) -> Result<ScheduleGrid, SchedulerError> {
        // 1. Check the numbers the grid is built from
        let slots_per_day = self.check(settings)?;
        let window_start = settings.window.start();

        // 2. Horizon and empty slots
        let mut grid = ScheduleGrid {
            days: horizon::horizon_dates(anchor, settings.week_start, self.config.horizon_days)
                .into_iter()
                .map(|date| Day::new(date, slots_per_day))
                .collect(),
            slot_minutes: settings.slot_minutes,
            window_start,
        };

        tracing::debug!(
            horizon_start = ?grid.horizon_start(),
            days = grid.days.len(),
            slots_per_day,
            slot_minutes = settings.slot_minutes,
            tasks = tasks.len(),
            "building schedule grid"
        );

        // 3. Fixed commitments
        if self.config.exclude_fixed {
            self.mark_fixed(&mut grid, settings);
        }

        // 4. Priority, then due date
        let ordered = Self::order_tasks(tasks);

        // 5. Greedy first-fit
        for task in ordered {
            self.assign(&mut grid, task);
        }

        Ok(grid)
    }

    /// Validate slot size, capacity and horizon; returns slots per day.
    fn check(&self, settings: &Settings) -> Result<usize, SchedulerError> {
        let slot_minutes = settings.slot_minutes;
        if slot_minutes == 0 {
            tracing::warn!("refusing to build grid: slot_minutes is zero");
            return Err(SchedulerError::invalid("slot_minutes", "must be positive"));
        }
        if 60 % slot_minutes != 0 {
            tracing::warn!(slot_minutes, "refusing to build grid: slot does not divide an hour");
            return Err(SchedulerError::invalid(
                "slot_minutes",
                format!("{slot_minutes} does not evenly divide 60"),
            ));
        }

        let capacity = settings.window.capacity_minutes();
        if !capacity.is_finite() || capacity <= 0.0 || capacity > f64::from(MINUTES_PER_DAY) {
            tracing::warn!(capacity, "refusing to build grid: bad daily capacity");
            return Err(SchedulerError::invalid(
                "window",
                format!("daily capacity must be within (0, 1440] minutes, got {capacity}"),
            ));
        }

        if self.config.horizon_days == 0 {
            return Err(SchedulerError::invalid("horizon_days", "must be positive"));
        }

        Ok(horizon::slots_per_day(capacity, slot_minutes))
    }

    /// Mark every slot covered by a commitment on its day.
    fn mark_fixed(&self, grid: &mut ScheduleGrid, settings: &Settings) {
        let window_start = grid.window_start;
        let slot_minutes = grid.slot_minutes;

        for day in &mut grid.days {
            let todays: Vec<_> = settings
                .fixed_schedules
                .iter()
                .filter(|c| c.applies_to(day.date))
                .collect();
            if todays.is_empty() {
                continue;
            }

            for slot in &mut day.slots {
                let clock: ClockTime = horizon::slot_clock(window_start, slot.slot_index, slot_minutes);
                if todays.iter().any(|c| c.covers(clock, slot_minutes)) {
                    slot.fixed = true;
                }
            }
        }
    }

    /// Stable sort by priority rank, ties broken by earlier due date.
    fn order_tasks(tasks: &[Task]) -> Vec<&Task> {
        let mut ordered: Vec<&Task> = tasks.iter().collect();
        ordered.sort_by_key(|t| (t.priority.rank(), t.due_date));
        ordered
    }

    /// Fill free slots for one task until its work or its window runs out.
    fn assign(&self, grid: &mut ScheduleGrid, task: &Task) {
        // Scratch copy; the caller's task is never touched.
        let mut remaining = self.config.remaining.hours(task) * 60.0;
        if remaining <= MINUTE_EPSILON {
            return;
        }

        let slot_minutes = f64::from(grid.slot_minutes);
        let mut placed = 0usize;

        'days: for day in &mut grid.days {
            if day.date > task.due_date {
                break;
            }
            for slot in &mut day.slots {
                if !slot.is_free() {
                    continue;
                }
                slot.task_id = Some(task.id.clone());
                slot.task_name = task.name.clone();
                remaining -= slot_minutes;
                placed += 1;
                tracing::trace!(
                    task_id = %task.id,
                    date = %day.date,
                    slot = slot.slot_index,
                    "slot assigned"
                );
                if remaining <= MINUTE_EPSILON {
                    break 'days;
                }
            }
        }

        tracing::debug!(
            task_id = %task.id,
            priority = %task.priority,
            due = %task.due_date,
            placed,
            unplaced_minutes = remaining.max(0.0),
            "task allocated"
        );
    }
}

/// Build a grid with the default (task-level) configuration.
pub fn build_grid(
    settings: &Settings,
    tasks: &[Task],
    anchor: NaiveDate,
) -> Result<ScheduleGrid, SchedulerError> {
    Scheduler::new().build_grid(settings, tasks, anchor)
}
