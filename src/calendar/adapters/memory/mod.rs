//! In-memory calendar adapters.

mod holiday;

pub use holiday::InMemoryHolidayRepository;
