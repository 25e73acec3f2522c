//! Date and slot arithmetic for the planning horizon.

use chrono::{Days, NaiveDate};

use crate::schedule::{ClockTime, WeekStart};

/// Consecutive dates starting at the week containing `anchor`.
pub fn horizon_dates(anchor: NaiveDate, week_start: WeekStart, days: u32) -> Vec<NaiveDate> {
    let start = week_start.start_of_week(anchor);
    (0..u64::from(days))
        .filter_map(|offset| start.checked_add_days(Days::new(offset)))
        .collect()
}

/// Number of whole slots that fit in a day's capacity.
pub fn slots_per_day(capacity_minutes: f64, slot_minutes: u32) -> usize {
    if slot_minutes == 0 || !capacity_minutes.is_finite() || capacity_minutes <= 0.0 {
        return 0;
    }
    (capacity_minutes / f64::from(slot_minutes)).floor() as usize
}

/// Minutes from the window start to the beginning of slot `index`.
pub fn slot_offset_minutes(index: usize, slot_minutes: u32) -> u32 {
    index as u32 * slot_minutes
}

/// Wall-clock start of slot `index`, wrapping past midnight.
pub fn slot_clock(window_start: ClockTime, index: usize, slot_minutes: u32) -> ClockTime {
    ClockTime::from_minutes(
        window_start.minutes_since_midnight() + slot_offset_minutes(index, slot_minutes),
    )
}
