//! Port abstractions for recurring templates.

mod materializer;
mod repository;
mod scheduler;

pub use materializer::{MaterializeError, MaterializeOutcome, TemplateMaterializer};
pub use repository::{PeriodicRepositoryError, PeriodicRepositoryResult, PeriodicTaskRepository};
pub use scheduler::JobScheduler;
