//! Port contracts for the task lifecycle.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod repository;

pub use repository::{
    TaskFilter, TaskGuard, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
};
