//! Calendar services.

mod holidays;
mod working_days;

pub use holidays::{HolidayService, HolidayServiceError, HolidayServiceResult};
pub use working_days::WorkingDayCalculator;
