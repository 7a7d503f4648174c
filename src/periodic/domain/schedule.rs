//! Cron expressions.
//!
//! Standard five-field expressions (minute hour day-of-month month
//! day-of-week) run at second zero, and their numeric weekdays count from
//! 0 = Sunday as crontab does. Six- and seven-field expressions that
//! include seconds, and optionally a year, are passed to the `cron` crate
//! as given, where weekday numbers count from 1 = Sunday.

use super::PeriodicDomainError;
use chrono::{DateTime, Utc};
use cron::Schedule;
use std::fmt;
use std::str::FromStr;

/// A parsed cron expression that remembers its original text.
#[derive(Clone)]
pub struct CronSchedule {
    expression: String,
    schedule: Schedule,
}

impl CronSchedule {
    /// Parses `expression`.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodicDomainError::InvalidCron`] when the expression has
    /// the wrong number of fields or a field does not parse.
    pub fn parse(expression: &str) -> Result<Self, PeriodicDomainError> {
        let trimmed = expression.trim();
        let invalid = |reason: String| PeriodicDomainError::InvalidCron {
            expression: trimmed.to_owned(),
            reason,
        };
        let normalized = match trimmed.split_whitespace().count() {
            5 => crontab_to_seconds(trimmed),
            6 | 7 => trimmed.to_owned(),
            fields => return Err(invalid(format!("expected 5 to 7 fields, found {fields}"))),
        };
        let schedule = Schedule::from_str(&normalized).map_err(|err| invalid(err.to_string()))?;
        Ok(Self {
            expression: trimmed.to_owned(),
            schedule,
        })
    }

    /// Returns the expression as supplied.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Returns the first firing strictly after `instant`.
    #[must_use]
    pub fn next_after(&self, instant: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(instant).next()
    }
}

/// Prefixes a zero seconds field and shifts numeric weekdays by one.
fn crontab_to_seconds(expression: &str) -> String {
    let fields: Vec<&str> = expression.split_whitespace().collect();
    let Some((weekday, rest)) = fields.split_last() else {
        return expression.to_owned();
    };
    format!("0 {} {}", rest.join(" "), shift_weekdays(weekday))
}

fn shift_weekdays(field: &str) -> String {
    field
        .split(',')
        .map(|item| match item.split_once('/') {
            Some((range, step)) => format!("{}/{step}", shift_range(range)),
            None => shift_range(item),
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn shift_range(range: &str) -> String {
    range
        .split('-')
        .map(|bound| match bound.parse::<u8>() {
            Ok(7) => "1".to_owned(),
            Ok(day) if day < 7 => (day + 1).to_string(),
            _ => bound.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("-")
}

impl fmt::Debug for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CronSchedule").field(&self.expression).finish()
    }
}

impl fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

impl PartialEq for CronSchedule {
    fn eq(&self, other: &Self) -> bool {
        self.expression == other.expression
    }
}

impl Eq for CronSchedule {}
