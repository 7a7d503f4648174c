//! Error types for template validation.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while validating recurring templates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PeriodicDomainError {
    /// The cron expression does not parse.
    #[error("invalid cron expression '{expression}': {reason}")]
    InvalidCron {
        /// Expression as supplied.
        expression: String,
        /// Parser message.
        reason: String,
    },

    /// The template title is blank.
    #[error("template title must not be empty")]
    EmptyTitle,

    /// The default effort is zero.
    #[error("template effort must be at least one hour")]
    ZeroEffort,

    /// The activity window ends before it starts.
    #[error("template window ends {end} before it starts {start}")]
    InvalidWindow {
        /// First active day.
        start: NaiveDate,
        /// Last active day.
        end: NaiveDate,
    },
}
