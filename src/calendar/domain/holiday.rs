//! Globally configured non-working days.

use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a holiday record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidayId(Uuid);

impl HolidayId {
    /// Creates a new random holiday identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for HolidayId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HolidayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A public holiday excluded from every user's working days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    id: HolidayId,
    date: NaiveDate,
    description: String,
    created_at: DateTime<Utc>,
}

impl Holiday {
    /// Creates a holiday record for the given date.
    #[must_use]
    pub fn new(date: NaiveDate, description: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            id: HolidayId::new(),
            date,
            description: description.into().trim().to_owned(),
            created_at: clock.utc(),
        }
    }

    /// Returns the holiday identifier.
    #[must_use]
    pub const fn id(&self) -> HolidayId {
        self.id
    }

    /// Returns the calendar date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
