//! Role-scoped task reads.

use crate::access::{Actor, Role};
use crate::error::ErrorKind;
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskFilter, TaskRepository, TaskRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for task reads.
#[derive(Debug, Error)]
pub enum TaskQueryError {
    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

impl TaskQueryError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) | Self::Repository(TaskRepositoryError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::Repository(_) => ErrorKind::Infrastructure,
        }
    }
}

/// Result type for task query operations.
pub type TaskQueryResult<T> = Result<T, TaskQueryError>;

/// Lists and fetches tasks.
#[derive(Clone)]
pub struct TaskQueryService<R>
where
    R: TaskRepository,
{
    repository: Arc<R>,
}

impl<R> TaskQueryService<R>
where
    R: TaskRepository,
{
    /// Creates a new query service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Lists the tasks the caller may see, newest first.
    ///
    /// Management sees every task, executors see their own work plus the
    /// pool, and creators see what they submitted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskQueryError::Repository`] when the query fails.
    pub async fn list_visible(&self, actor: &Actor) -> TaskQueryResult<Vec<Task>> {
        let filter = match actor.role() {
            Role::Manager | Role::SystemAdmin => TaskFilter::All,
            Role::Executor => TaskFilter::VisibleToExecutor(actor.user_id()),
            Role::Creator => TaskFilter::CreatedBy(actor.user_id()),
        };
        Ok(self.repository.list(filter).await?)
    }

    /// Fetches a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskQueryError::NotFound`] when the task does not exist.
    pub async fn get(&self, task_id: TaskId) -> TaskQueryResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskQueryError::NotFound(task_id))
    }

    /// Lists the direct subtasks of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskQueryError::Repository`] when the query fails.
    pub async fn subtasks(&self, parent: TaskId) -> TaskQueryResult<Vec<Task>> {
        Ok(self.repository.find_subtasks(parent).await?)
    }
}
