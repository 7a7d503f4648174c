//! Read-only view of approved leave used by working-day arithmetic.

use super::CalendarRepositoryResult;
use crate::access::UserId;
use crate::calendar::domain::DateRange;
use async_trait::async_trait;

/// Source of a user's approved leave ranges.
///
/// Implemented by the leave store so the calculator does not depend on the
/// leave module's repository shape.
#[async_trait]
pub trait LeaveCalendar: Send + Sync {
    /// Returns the user's approved leave ranges overlapping `window`.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the query fails.
    async fn leave_ranges(
        &self,
        user_id: UserId,
        window: DateRange,
    ) -> CalendarRepositoryResult<Vec<DateRange>>;
}
