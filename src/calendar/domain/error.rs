//! Error types for calendar validation.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing calendar values.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CalendarDomainError {
    /// The end of a range falls before its start.
    #[error("end date {end} is before start date {start}")]
    InvalidDateRange {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
    },
}
