//! Per-operation authorization rules.
//!
//! Each function takes the caller and the ownership fields of the entity
//! being acted on and either allows the call or returns [`AccessDenied`].
//! Status checks are not made here; services combine a policy decision
//! with the domain transition guard.

use super::{Actor, Role, UserId};
use std::fmt;
use thiserror::Error;

/// Operation being authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Approve a task out of review.
    ApproveTask,
    /// Reject a task under review.
    RejectTask,
    /// Resubmit a rejected task.
    ResubmitTask,
    /// Claim a pooled task.
    ClaimTask,
    /// Assign a pooled task to an executor.
    AssignTask,
    /// Carve a subtask out of an in-progress task.
    CreateSubtask,
    /// Submit a task for evaluation.
    CompleteTask,
    /// Score a finished task.
    EvaluateTask,
    /// Edit task details.
    UpdateTask,
    /// Remove a task.
    DeleteTask,
    /// Hand a task to another executor.
    InitiateTransfer,
    /// Accept or reject an incoming handover.
    RespondToTransfer,
    /// Withdraw an outgoing handover.
    CancelTransfer,
    /// Create, edit, toggle or delete recurring templates.
    ManagePeriodicTasks,
    /// Create or delete holidays.
    ManageHolidays,
    /// Change stored system configuration.
    ManageSettings,
    /// Set a member's personal daily capacity.
    ManageCapacity,
    /// Read team load and task counts.
    ViewPersonnel,
}

impl Operation {
    /// Returns a stable snake-case name used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApproveTask => "approve_task",
            Self::RejectTask => "reject_task",
            Self::ResubmitTask => "resubmit_task",
            Self::ClaimTask => "claim_task",
            Self::AssignTask => "assign_task",
            Self::CreateSubtask => "create_subtask",
            Self::CompleteTask => "complete_task",
            Self::EvaluateTask => "evaluate_task",
            Self::UpdateTask => "update_task",
            Self::DeleteTask => "delete_task",
            Self::InitiateTransfer => "initiate_transfer",
            Self::RespondToTransfer => "respond_to_transfer",
            Self::CancelTransfer => "cancel_transfer",
            Self::ManagePeriodicTasks => "manage_periodic_tasks",
            Self::ManageHolidays => "manage_holidays",
            Self::ManageSettings => "manage_settings",
            Self::ManageCapacity => "manage_capacity",
            Self::ViewPersonnel => "view_personnel",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a caller may not perform an operation.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("permission denied: {user_id} ({role}) may not {operation}")]
pub struct AccessDenied {
    /// Operation that was refused.
    pub operation: Operation,
    /// Caller identifier.
    pub user_id: UserId,
    /// Caller role.
    pub role: Role,
}

/// Result of a policy decision.
pub type PolicyResult = Result<(), AccessDenied>;

/// Who is asking to evaluate a task, relative to the task's position in the
/// hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationScope {
    /// The task has no parent and is evaluated by management.
    MainTask,
    /// The task is a subtask and is evaluated by the parent's assignee.
    Subtask {
        /// Current assignee of the parent task, if any.
        parent_assignee: Option<UserId>,
    },
}

fn decide(actor: &Actor, operation: Operation, allowed: bool) -> PolicyResult {
    if allowed {
        Ok(())
    } else {
        Err(AccessDenied {
            operation,
            user_id: actor.user_id(),
            role: actor.role(),
        })
    }
}

/// Allows managers and system administrators.
///
/// Used for approve, reject, assign, recurring template management and
/// the personnel dashboard.
///
/// # Errors
///
/// Returns [`AccessDenied`] for creator and executor roles.
pub fn privileged(actor: &Actor, operation: Operation) -> PolicyResult {
    decide(actor, operation, actor.role().is_privileged())
}

/// Allows system administrators only.
///
/// # Errors
///
/// Returns [`AccessDenied`] for every other role.
pub fn administrator(actor: &Actor, operation: Operation) -> PolicyResult {
    decide(actor, operation, actor.role() == Role::SystemAdmin)
}

/// Allows executors and managers to take work from the pool.
///
/// # Errors
///
/// Returns [`AccessDenied`] for creators and system administrators.
pub fn claim(actor: &Actor) -> PolicyResult {
    decide(
        actor,
        Operation::ClaimTask,
        matches!(actor.role(), Role::Executor | Role::Manager),
    )
}

/// Allows only the original creator to resubmit.
///
/// # Errors
///
/// Returns [`AccessDenied`] when the caller did not create the task.
pub fn resubmit(actor: &Actor, creator: UserId) -> PolicyResult {
    decide(actor, Operation::ResubmitTask, actor.is(creator))
}

/// Allows only the current assignee.
///
/// Used for completing, subtasking and handing over a task.
///
/// # Errors
///
/// Returns [`AccessDenied`] when the task is unassigned or assigned to
/// someone else.
pub fn assignee(actor: &Actor, operation: Operation, assignee: Option<UserId>) -> PolicyResult {
    decide(actor, operation, assignee.is_some_and(|id| actor.is(id)))
}

/// Main tasks are evaluated by management; subtasks by whoever currently
/// owns the parent.
///
/// # Errors
///
/// Returns [`AccessDenied`] when the caller is neither.
pub fn evaluate(actor: &Actor, scope: EvaluationScope) -> PolicyResult {
    let allowed = match scope {
        EvaluationScope::MainTask => actor.role().is_privileged(),
        EvaluationScope::Subtask { parent_assignee } => {
            parent_assignee.is_some_and(|id| actor.is(id))
        }
    };
    decide(actor, Operation::EvaluateTask, allowed)
}

/// Management may always edit; the creator may edit a rejected task.
///
/// # Errors
///
/// Returns [`AccessDenied`] otherwise.
pub fn update(actor: &Actor, creator: UserId, is_rejected: bool) -> PolicyResult {
    let allowed = actor.role().is_privileged() || (is_rejected && actor.is(creator));
    decide(actor, Operation::UpdateTask, allowed)
}

/// Management may always delete; the parent's assignee may delete a
/// subtask; the creator may delete a rejected task.
///
/// # Errors
///
/// Returns [`AccessDenied`] otherwise.
pub fn delete(
    actor: &Actor,
    creator: UserId,
    is_rejected: bool,
    parent_assignee: Option<UserId>,
) -> PolicyResult {
    let allowed = actor.role().is_privileged()
        || parent_assignee.is_some_and(|id| actor.is(id))
        || (is_rejected && actor.is(creator));
    decide(actor, Operation::DeleteTask, allowed)
}

/// Allows only the named recipient to answer a handover.
///
/// # Errors
///
/// Returns [`AccessDenied`] for anyone else.
pub fn transfer_recipient(actor: &Actor, to_user: UserId) -> PolicyResult {
    decide(actor, Operation::RespondToTransfer, actor.is(to_user))
}

/// Allows only the initiator to withdraw a handover.
///
/// # Errors
///
/// Returns [`AccessDenied`] for anyone else.
pub fn transfer_initiator(actor: &Actor, from_user: UserId) -> PolicyResult {
    decide(actor, Operation::CancelTransfer, actor.is(from_user))
}
