//! Pure working-day counting rules.
//!
//! All functions compare at day granularity and return `0` when
//! `start > end`.

use super::DateRange;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

/// Returns `true` for Saturdays and Sundays.
#[must_use]
pub fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Counts weekdays in `[start, end]`, ignoring holidays and leave.
#[must_use]
pub fn calendar_working_days(start: NaiveDate, end: NaiveDate) -> u32 {
    count_days(start, end, |day| !is_weekend(day))
}

/// Counts days in `[start, end]` that are neither weekends, holidays nor
/// covered by any of the given leave ranges.
#[must_use]
pub fn available_working_days(
    start: NaiveDate,
    end: NaiveDate,
    holidays: &BTreeSet<NaiveDate>,
    leaves: &[DateRange],
) -> u32 {
    count_days(start, end, |day| {
        !is_weekend(day) && !holidays.contains(&day) && !leaves.iter().any(|l| l.contains(day))
    })
}

fn count_days(start: NaiveDate, end: NaiveDate, keep: impl Fn(NaiveDate) -> bool) -> u32 {
    let Ok(range) = DateRange::new(start, end) else {
        return 0;
    };
    range
        .days()
        .filter(|day| keep(*day))
        .fold(0_u32, |count, _| count.saturating_add(1))
}
