//! Port invoked on every trigger firing.

use crate::periodic::{domain::PeriodicTaskId, ports::PeriodicRepositoryError};
use crate::task::{
    domain::{Task, TaskDomainError},
    ports::TaskRepositoryError,
};
use async_trait::async_trait;
use thiserror::Error;

/// What a firing did.
#[derive(Debug, Clone)]
pub enum MaterializeOutcome {
    /// A pooled task was created.
    Created(Box<Task>),
    /// Today precedes the template's start date; nothing was created.
    NotYetStarted,
    /// Today is past the end date; the template was deactivated.
    Retired,
    /// The template is switched off.
    Inactive,
    /// The template no longer exists.
    Missing,
}

/// Failure while materializing a template.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// Template storage failed.
    #[error(transparent)]
    Repository(#[from] PeriodicRepositoryError),
    /// Task storage failed.
    #[error(transparent)]
    Task(#[from] TaskRepositoryError),
    /// Template defaults do not form a valid task.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
}

/// Turns a template into a concrete task.
#[async_trait]
pub trait TemplateMaterializer: Send + Sync {
    /// Handles one firing of the template's trigger.
    async fn materialize(&self, id: PeriodicTaskId) -> Result<MaterializeOutcome, MaterializeError>;
}
