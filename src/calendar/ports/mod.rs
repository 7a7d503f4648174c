//! Port abstractions for calendar data.

mod leave_calendar;
mod repository;

pub use leave_calendar::LeaveCalendar;
pub use repository::{CalendarRepositoryError, CalendarRepositoryResult, HolidayRepository};
