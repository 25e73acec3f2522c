//! Settings-side schedule types: clock times, daily windows and fixed commitments.
//!
//! These are the records the settings store hands to the scheduler. They are
//! validated here, at the boundary, so the engine can assume well-formed
//! input.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock time of day with minute precision (`HH:MM`, 24h).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    minutes: u32,
}

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime { minutes: 0 };

    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(Self {
            minutes: hour * 60 + minute,
        })
    }

    /// Build from minutes since midnight, wrapping past 24:00.
    pub fn from_minutes(minutes: u32) -> Self {
        Self {
            minutes: minutes % MINUTES_PER_DAY,
        }
    }

    /// Parse an `HH:MM` string.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let (hour, minute) = value
            .trim()
            .split_once(':')
            .ok_or_else(|| ValidationError::invalid("time", format!("'{value}' is not HH:MM")))?;

        let hour: u32 = hour
            .parse()
            .map_err(|_| ValidationError::invalid("time", format!("bad hour in '{value}'")))?;
        let minute: u32 = minute
            .parse()
            .map_err(|_| ValidationError::invalid("time", format!("bad minute in '{value}'")))?;

        Self::new(hour, minute)
            .ok_or_else(|| ValidationError::invalid("time", format!("'{value}' is out of range")))
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.minutes
    }

    pub fn hour(&self) -> u32 {
        self.minutes / 60
    }

    pub fn minute(&self) -> u32 {
        self.minutes % 60
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// First day of the planning week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Start of the week containing `date`.
    pub fn start_of_week(&self, date: NaiveDate) -> NaiveDate {
        let offset = match self {
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
            WeekStart::Monday => date.weekday().num_days_from_monday(),
        };
        date - Duration::days(i64::from(offset))
    }
}

/// Source of a day's schedulable window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DailyWindow {
    /// Uniform net working hours per day, already excluding commitments.
    IdealHours { hours: f64 },
    /// Explicit wake/bed bounds on the same calendar day. Bed must be after wake.
    WakeBed { wake: ClockTime, bed: ClockTime },
}

impl DailyWindow {
    /// Daily capacity in minutes. Zero or negative when bed is not after wake.
    pub fn capacity_minutes(&self) -> f64 {
        match self {
            DailyWindow::IdealHours { hours } => hours * 60.0,
            DailyWindow::WakeBed { wake, bed } => {
                f64::from(bed.minutes_since_midnight()) - f64::from(wake.minutes_since_midnight())
            }
        }
    }

    /// Clock time the first slot of each day starts at.
    pub fn start(&self) -> ClockTime {
        match self {
            DailyWindow::IdealHours { .. } => ClockTime::MIDNIGHT,
            DailyWindow::WakeBed { wake, .. } => *wake,
        }
    }
}

impl Default for DailyWindow {
    fn default() -> Self {
        DailyWindow::IdealHours { hours: 4.0 }
    }
}

/// When a fixed commitment occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentWhen {
    /// Recurs on this weekday every week.
    DayOfWeek(Weekday),
    /// Occurs once, on this date.
    Date(NaiveDate),
}

/// A class, shift or other block that pre-occupies slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedCommitment {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    pub when: CommitmentWhen,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

impl FixedCommitment {
    pub fn weekly(id: impl Into<String>, day: Weekday, start: ClockTime, end: ClockTime) -> Self {
        Self {
            id: id.into(),
            label: None,
            when: CommitmentWhen::DayOfWeek(day),
            start_time: start,
            end_time: end,
        }
    }

    pub fn dated(id: impl Into<String>, date: NaiveDate, start: ClockTime, end: ClockTime) -> Self {
        Self {
            id: id.into(),
            label: None,
            when: CommitmentWhen::Date(date),
            start_time: start,
            end_time: end,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn applies_to(&self, date: NaiveDate) -> bool {
        match self.when {
            CommitmentWhen::DayOfWeek(day) => date.weekday() == day,
            CommitmentWhen::Date(d) => d == date,
        }
    }

    /// Whether the slot `[slot_start, slot_start + slot_minutes)` overlaps
    /// `[start_time, end_time)`.
    pub fn covers(&self, slot_start: ClockTime, slot_minutes: u32) -> bool {
        let start = slot_start.minutes_since_midnight();
        start < self.end_time.minutes_since_midnight()
            && start + slot_minutes > self.start_time.minutes_since_midnight()
    }
}

/// Global scheduling settings supplied by the settings store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub window: DailyWindow,
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    #[serde(default)]
    pub fixed_schedules: Vec<FixedCommitment>,
    #[serde(default)]
    pub week_start: WeekStart,
}

fn default_slot_minutes() -> u32 {
    60
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: DailyWindow::default(),
            slot_minutes: default_slot_minutes(),
            fixed_schedules: Vec::new(),
            week_start: WeekStart::default(),
        }
    }
}

impl Settings {
    pub fn with_ideal_hours(hours: f64, slot_minutes: u32) -> Self {
        Self {
            window: DailyWindow::IdealHours { hours },
            slot_minutes,
            ..Self::default()
        }
    }

    pub fn with_wake_bed(wake: ClockTime, bed: ClockTime, slot_minutes: u32) -> Self {
        Self {
            window: DailyWindow::WakeBed { wake, bed },
            slot_minutes,
            ..Self::default()
        }
    }

    /// Check the settings-store contract before the engine sees these values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.slot_minutes == 0 || 60 % self.slot_minutes != 0 {
            return Err(ValidationError::invalid(
                "slot_minutes",
                format!("{} does not evenly divide an hour", self.slot_minutes),
            ));
        }

        if let DailyWindow::WakeBed { wake, bed } = &self.window {
            if bed <= wake {
                return Err(ValidationError::invalid(
                    "window",
                    format!("bed time {bed} must be after wake time {wake} on the same day"),
                ));
            }
        }

        let capacity = self.window.capacity_minutes();
        if !capacity.is_finite() || capacity <= 0.0 || capacity > f64::from(MINUTES_PER_DAY) {
            return Err(ValidationError::invalid(
                "window",
                format!("daily capacity must be within (0, {MINUTES_PER_DAY}] minutes, got {capacity}"),
            ));
        }

        for commitment in &self.fixed_schedules {
            if commitment.end_time <= commitment.start_time {
                return Err(ValidationError::invalid(
                    "fixed_schedules",
                    format!(
                        "commitment '{}' ends ({}) before it starts ({})",
                        commitment.id, commitment.end_time, commitment.start_time
                    ),
                ));
            }
        }

        Ok(())
    }
}
