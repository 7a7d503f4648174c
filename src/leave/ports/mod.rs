//! Port abstractions for leave storage.

mod repository;

pub use repository::{LeaveRepository, LeaveRepositoryError, LeaveRepositoryResult};
