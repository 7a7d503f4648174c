//! The global daily capacity setting.

use thiserror::Error;

/// Key under which the default daily capacity is stored.
pub const GLOBAL_DAILY_WORK_HOURS: &str = "global_daily_work_hours";

/// Capacity used when the setting is absent or unreadable.
pub const DEFAULT_DAILY_WORK_HOURS: f64 = 8.0;

/// Errors returned when validating configuration values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SettingsDomainError {
    /// Value does not parse as a number.
    #[error("{key} must be numeric, got {value:?}")]
    NotNumeric {
        /// Configuration key.
        key: String,
        /// Rejected raw value.
        value: String,
    },
    /// Value parses but is zero, negative or not finite.
    #[error("{key} must be a positive number, got {value:?}")]
    NotPositive {
        /// Configuration key.
        key: String,
        /// Rejected raw value.
        value: String,
    },
}

/// Parses a stored daily-hours value.
///
/// # Errors
///
/// Returns [`SettingsDomainError`] when the value is not a finite positive
/// number.
pub fn parse_daily_hours(raw: &str) -> Result<f64, SettingsDomainError> {
    let trimmed = raw.trim();
    let hours: f64 = trimmed.parse().map_err(|_| SettingsDomainError::NotNumeric {
        key: GLOBAL_DAILY_WORK_HOURS.to_owned(),
        value: trimmed.to_owned(),
    })?;
    if !hours.is_finite() || hours <= 0.0 {
        return Err(SettingsDomainError::NotPositive {
            key: GLOBAL_DAILY_WORK_HOURS.to_owned(),
            value: trimmed.to_owned(),
        });
    }
    Ok(hours)
}
