//! Orchestration services for the task lifecycle.

mod lifecycle;
mod query;

pub use lifecycle::{
    ApproveTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
};
pub use query::{TaskQueryError, TaskQueryResult, TaskQueryService};
