//! Shared clock and identity helpers for integration tests.

use chrono::{DateTime, Local, NaiveDate, Utc};
use mockable::Clock;
use taskflow::access::{Actor, Role, UserId};

/// Clock pinned to 09:00 UTC on a chosen day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Pins the clock to the given date.
    pub fn on(day: NaiveDate) -> Self {
        let instant = day
            .and_hms_opt(9, 0, 0)
            .expect("09:00 is a valid time")
            .and_utc();
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Builds a calendar date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

/// Creates an actor with a fresh identity.
pub fn actor(role: Role) -> Actor {
    Actor::new(UserId::new(), role)
}
