//! Orchestration services for recurring templates.

mod materializer;
mod template;

pub use materializer::PeriodicTaskMaterializer;
pub use template::{PeriodicServiceError, PeriodicServiceResult, PeriodicTaskService};
