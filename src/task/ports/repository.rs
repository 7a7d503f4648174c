//! Repository port for task persistence, conditional updates and subtask
//! aggregates.

use crate::access::UserId;
use crate::task::domain::{Task, TaskId, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Status and assignee observed when a task was read.
///
/// A conditional update only applies while the stored row still matches,
/// so two callers racing on the same transition cannot both win.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskGuard {
    /// Expected stored status.
    pub status: TaskStatus,
    /// Expected stored assignee.
    pub assignee: Option<UserId>,
}

impl TaskGuard {
    /// Captures the guard from a freshly read task.
    #[must_use]
    pub const fn of(task: &Task) -> Self {
        Self {
            status: task.status(),
            assignee: task.assignee_id(),
        }
    }

    /// Returns `true` when `task` still matches the guard.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        task.status() == self.status && task.assignee_id() == self.assignee
    }
}

/// Row selection for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFilter {
    /// Every task.
    All,
    /// Tasks created by the user.
    CreatedBy(UserId),
    /// Tasks assigned to the user plus every pooled task.
    VisibleToExecutor(UserId),
    /// Tasks in `status` assigned to `assignee`.
    AssignedWithStatus {
        /// Assignee to match.
        assignee: UserId,
        /// Status to match.
        status: TaskStatus,
    },
}

impl TaskFilter {
    /// Returns `true` when `task` is selected by the filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        match *self {
            Self::All => true,
            Self::CreatedBy(creator) => task.creator_id() == creator,
            Self::VisibleToExecutor(user) => {
                task.assignee_id() == Some(user) || task.status() == TaskStatus::InPool
            }
            Self::AssignedWithStatus { assignee, status } => {
                task.assignee_id() == Some(assignee) && task.status() == status
            }
        }
    }
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Replaces a task only if its stored status and assignee still match
    /// `guard`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::Conflict`] when the guard no longer holds.
    async fn update_if(&self, task: &Task, guard: TaskGuard) -> TaskRepositoryResult<()>;

    /// Removes a task. Subtasks are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists tasks selected by `filter`, newest first.
    async fn list(&self, filter: TaskFilter) -> TaskRepositoryResult<Vec<Task>>;

    /// Lists the direct subtasks of `parent`.
    async fn find_subtasks(&self, parent: TaskId) -> TaskRepositoryResult<Vec<Task>>;

    /// Sums the effort of every direct subtask of `parent`.
    async fn subtask_effort_total(&self, parent: TaskId) -> TaskRepositoryResult<u64>;

    /// Counts direct subtasks of `parent` that are not completed.
    async fn count_incomplete_subtasks(&self, parent: TaskId) -> TaskRepositoryResult<u64>;

    /// Moves every subtask of `parent` assigned to `from` over to `to`.
    ///
    /// Returns the number of subtasks reassigned.
    async fn reassign_subtasks(
        &self,
        parent: TaskId,
        from: UserId,
        to: UserId,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<u64>;

    /// Counts tasks currently in `status`.
    async fn count_by_status(&self, status: TaskStatus) -> TaskRepositoryResult<u64>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored task changed since it was read.
    #[error("task {task_id} changed concurrently; expected status {expected}")]
    Conflict {
        /// Task whose guard failed.
        task_id: TaskId,
        /// Status the caller expected.
        expected: TaskStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
