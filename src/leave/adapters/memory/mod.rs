//! In-memory leave adapter.

mod leave;

pub use leave::InMemoryLeaveRepository;
