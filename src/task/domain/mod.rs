//! Domain model for the task lifecycle.
//!
//! The [`Task`] aggregate owns every status change; each transition method
//! checks the current status against the graph documented on
//! [`TaskStatus`] before mutating anything.

mod error;
mod ids;
mod rating;
mod status;
mod task;

pub use error::{ParsePriorityError, ParseTaskStatusError, RatingError, TaskDomainError};
pub use ids::{TaskId, TaskTypeId};
pub use rating::{DifficultyRating, DifficultyScores, Evaluation, EvaluationScores};
pub use status::{Priority, TaskStatus};
pub use task::{
    Approval, NewTask, PersistedTaskData, ScheduledTaskDraft, SubtaskDraft, Task,
    TaskDetailsUpdate,
};
