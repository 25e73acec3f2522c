//! The scheduler's output: days of fixed-size slots.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::horizon;
use crate::schedule::ClockTime;

/// One schedulable cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub slot_index: usize,
    pub task_id: Option<String>,
    pub task_name: String,
    /// Occupied by a fixed commitment; never receives a task.
    pub fixed: bool,
}

impl Slot {
    pub fn empty(slot_index: usize) -> Self {
        Self {
            slot_index,
            task_id: None,
            task_name: String::new(),
            fixed: false,
        }
    }

    pub fn is_free(&self) -> bool {
        self.task_id.is_none() && !self.fixed
    }

    pub fn is_assigned_to(&self, task_id: &str) -> bool {
        self.task_id.as_deref() == Some(task_id)
    }
}

/// All slots of one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
}

impl Day {
    pub fn new(date: NaiveDate, slots_per_day: usize) -> Self {
        Self {
            date,
            slots: (0..slots_per_day).map(Slot::empty).collect(),
        }
    }

    pub fn free_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_free()).count()
    }
}

/// Disposable result of one allocation pass.
///
/// Rebuilt from scratch whenever settings or tasks change; never edited and
/// fed back to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleGrid {
    pub days: Vec<Day>,
    pub slot_minutes: u32,
    /// Clock time slot 0 starts at, for labelling rows.
    pub window_start: ClockTime,
}

impl ScheduleGrid {
    pub fn slots_per_day(&self) -> usize {
        self.days.first().map(|d| d.slots.len()).unwrap_or(0)
    }

    pub fn horizon_start(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }

    pub fn horizon_end(&self) -> Option<NaiveDate> {
        self.days.last().map(|d| d.date)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&Day> {
        self.days.iter().find(|d| d.date == date)
    }

    pub fn slot_offset_minutes(&self, index: usize) -> u32 {
        horizon::slot_offset_minutes(index, self.slot_minutes)
    }

    pub fn slot_clock(&self, index: usize) -> ClockTime {
        horizon::slot_clock(self.window_start, index, self.slot_minutes)
    }

    /// Every slot held by `task_id`, with its date, in scan order.
    pub fn assigned_slots<'a>(
        &'a self,
        task_id: &'a str,
    ) -> impl Iterator<Item = (NaiveDate, &'a Slot)> + 'a {
        self.days.iter().flat_map(move |day| {
            day.slots
                .iter()
                .filter(move |s| s.is_assigned_to(task_id))
                .map(move |s| (day.date, s))
        })
    }

    pub fn assigned_hours(&self, task_id: &str) -> f64 {
        let count = self.assigned_slots(task_id).count();
        count as f64 * f64::from(self.slot_minutes) / 60.0
    }

    pub fn assigned_slot_count(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| d.slots.iter())
            .filter(|s| s.task_id.is_some())
            .count()
    }

    pub fn fixed_slot_count(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| d.slots.iter())
            .filter(|s| s.fixed)
            .count()
    }
}
