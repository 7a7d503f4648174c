//! Per-user working-day availability.

use crate::access::UserId;
use crate::calendar::{
    domain::{DateRange, workdays},
    ports::{CalendarRepositoryResult, HolidayRepository, LeaveCalendar},
};
use chrono::NaiveDate;
use std::sync::Arc;

/// Counts the days a user can actually work in a date window.
#[derive(Clone)]
pub struct WorkingDayCalculator<H, L>
where
    H: HolidayRepository,
    L: LeaveCalendar,
{
    holidays: Arc<H>,
    leaves: Arc<L>,
}

impl<H, L> WorkingDayCalculator<H, L>
where
    H: HolidayRepository,
    L: LeaveCalendar,
{
    /// Creates a calculator over the given holiday and leave sources.
    #[must_use]
    pub const fn new(holidays: Arc<H>, leaves: Arc<L>) -> Self {
        Self { holidays, leaves }
    }

    /// Counts days in `[start, end]` that are not weekends, not holidays and
    /// not covered by the user's approved leave.
    ///
    /// Returns `0` when `start > end`.
    ///
    /// # Errors
    ///
    /// Returns a repository error when holidays or leave cannot be read.
    pub async fn working_days_available(
        &self,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CalendarRepositoryResult<u32> {
        let Ok(window) = DateRange::new(start, end) else {
            return Ok(0);
        };
        let holidays = self.holidays.dates_in_range(window).await?;
        let leaves = self.leaves.leave_ranges(user_id, window).await?;
        Ok(workdays::available_working_days(
            start, end, &holidays, &leaves,
        ))
    }

    /// Counts weekdays in `[start, end]`, ignoring holidays and leave.
    #[must_use]
    pub fn calendar_working_days(start: NaiveDate, end: NaiveDate) -> u32 {
        workdays::calendar_working_days(start, end)
    }
}
