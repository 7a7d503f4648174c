//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use crate::access::UserId;
use crate::error::ErrorKind;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned by task invariants and transitions.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskDomainError {
    /// The title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// Effort must be at least one hour.
    #[error("effort must be greater than zero")]
    ZeroEffort,

    /// The task is not in the status the operation requires.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidStateTransition {
        /// Task being transitioned.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// The task is reserved for another executor.
    #[error("task {task_id} is already assigned to {assignee}")]
    AlreadyAssigned {
        /// Task being claimed.
        task_id: TaskId,
        /// Existing assignee.
        assignee: UserId,
    },

    /// Subtasks may only be carved from an in-progress task.
    #[error("parent task {parent_id} is {status}, expected in_progress")]
    ParentNotInProgress {
        /// Parent task.
        parent_id: TaskId,
        /// Parent's current status.
        status: TaskStatus,
    },

    /// The subtask would outlive its parent.
    #[error("subtask due date {due_date} is after parent due date {parent_due_date}")]
    SubtaskDueAfterParent {
        /// Requested subtask due date.
        due_date: NaiveDate,
        /// Parent's due date.
        parent_due_date: NaiveDate,
    },

    /// The subtask would exceed the parent's effort budget.
    #[error("subtask effort {requested} exceeds remaining budget {remaining} of task {parent_id}")]
    SubtaskBudgetExceeded {
        /// Parent task.
        parent_id: TaskId,
        /// Requested subtask effort.
        requested: u32,
        /// Budget left after existing subtasks.
        remaining: u64,
    },

    /// A main task still has unfinished subtasks.
    #[error("task {task_id} has {count} incomplete subtasks")]
    IncompleteSubtasks {
        /// Main task.
        task_id: TaskId,
        /// Number of subtasks not yet completed.
        count: u64,
    },

    /// A rating record is malformed.
    #[error(transparent)]
    Rating(#[from] RatingError),
}

impl TaskDomainError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyTitle | Self::ZeroEffort | Self::Rating(_) => ErrorKind::Validation,
            Self::InvalidStateTransition { .. }
            | Self::AlreadyAssigned { .. }
            | Self::ParentNotInProgress { .. }
            | Self::SubtaskDueAfterParent { .. }
            | Self::SubtaskBudgetExceeded { .. }
            | Self::IncompleteSubtasks { .. } => ErrorKind::StateConflict,
        }
    }
}

/// Errors returned while validating a four-dimension rating.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RatingError {
    /// The payload is not a JSON object.
    #[error("rating must be an object of named scores")]
    NotAnObject,
    /// A required dimension is absent.
    #[error("rating dimension {0} is missing")]
    MissingDimension(&'static str),
    /// A dimension is present but not a finite number.
    #[error("rating dimension {0} must be a finite number")]
    NotNumeric(&'static str),
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing priorities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);
