//! Domain model for calendars and working days.

mod error;
mod holiday;
mod range;
pub mod workdays;

pub use error::CalendarDomainError;
pub use holiday::{Holiday, HolidayId};
pub use range::DateRange;
