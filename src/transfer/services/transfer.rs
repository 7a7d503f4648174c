//! Handover workflow.
//!
//! Answers resolve the handover row first, guarded on `pending`, so a stale
//! or racing answer fails before the task is touched. The task follows
//! under its own guard; if that misses, the handover is reopened.

use crate::access::{AccessDenied, Actor, Operation, UserId, policy};
use crate::error::ErrorKind;
use crate::task::{
    domain::{Task, TaskDomainError, TaskId, TaskStatus},
    ports::{TaskGuard, TaskRepository, TaskRepositoryError},
};
use crate::transfer::{
    domain::{TaskTransfer, TransferDecision, TransferDomainError, TransferId},
    ports::{TransferRepository, TransferRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for handover operations.
#[derive(Debug, Error)]
pub enum TransferServiceError {
    /// Handover rule violated.
    #[error(transparent)]
    Domain(#[from] TransferDomainError),
    /// Task transition refused.
    #[error(transparent)]
    Task(#[from] TaskDomainError),
    /// Caller may not perform the operation.
    #[error(transparent)]
    Access(#[from] AccessDenied),
    /// Handover storage failed.
    #[error(transparent)]
    Repository(#[from] TransferRepositoryError),
    /// Task storage failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),
    /// The referenced handover does not exist.
    #[error("transfer not found: {0}")]
    NotFound(TransferId),
    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
}

impl TransferServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Task(err) => err.kind(),
            Self::Access(_) => ErrorKind::PermissionDenied,
            Self::NotFound(_)
            | Self::TaskNotFound(_)
            | Self::Repository(TransferRepositoryError::NotFound(_))
            | Self::TaskRepository(TaskRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::Repository(
                TransferRepositoryError::NotPending(_)
                | TransferRepositoryError::DuplicateTransfer(_),
            )
            | Self::TaskRepository(
                TaskRepositoryError::Conflict { .. } | TaskRepositoryError::DuplicateTask(_),
            ) => ErrorKind::StateConflict,
            Self::Repository(TransferRepositoryError::Persistence(_))
            | Self::TaskRepository(TaskRepositoryError::Persistence(_)) => {
                ErrorKind::Infrastructure
            }
        }
    }
}

/// Result type for handover service operations.
pub type TransferServiceResult<T> = Result<T, TransferServiceError>;

/// Outcome of a step that runs after the primary change has committed.
///
/// Its failure is reported here and logged, never returned as an error.
#[derive(Debug, Clone)]
pub enum SecondaryEffect {
    /// The step ran.
    Applied {
        /// Number of records it touched.
        count: u64,
    },
    /// The step failed after the primary change was kept.
    Failed {
        /// Cause of the failure.
        error: TaskRepositoryError,
    },
    /// The step does not apply to this outcome.
    NotApplicable,
}

/// Result of answering a handover.
#[derive(Debug, Clone)]
pub struct TransferResolution {
    /// The resolved handover.
    pub transfer: TaskTransfer,
    /// The task after the answer was applied.
    pub task: Task,
    /// Subtask reassignment that follows an acceptance.
    pub cascade: SecondaryEffect,
}

/// Handover orchestration service.
#[derive(Clone)]
pub struct TransferService<T, X, C>
where
    T: TaskRepository,
    X: TransferRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    transfers: Arc<X>,
    clock: Arc<C>,
}

impl<T, X, C> TransferService<T, X, C>
where
    T: TaskRepository,
    X: TransferRepository,
    C: Clock + Send + Sync,
{
    /// Creates a handover service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, transfers: Arc<X>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            transfers,
            clock,
        }
    }

    /// Offers the caller's in-progress task to `to_user`.
    ///
    /// `effort_spent` is deducted from the original effort if the recipient
    /// accepts.
    ///
    /// # Errors
    ///
    /// Returns [`TransferServiceError`] when the task is missing or not in
    /// progress, the caller is not its assignee, the recipient is the
    /// caller, or another handover won the race.
    pub async fn initiate(
        &self,
        actor: &Actor,
        task_id: TaskId,
        to_user: UserId,
        effort_spent: u32,
    ) -> TransferServiceResult<TaskTransfer> {
        let mut task = self.load_task(task_id).await?;
        let guard = TaskGuard::of(&task);
        task.ensure_transition(TaskStatus::InProgress, TaskStatus::PendingTransfer)?;
        policy::assignee(actor, Operation::InitiateTransfer, task.assignee_id())?;
        let transfer =
            TaskTransfer::new(task_id, actor.user_id(), to_user, effort_spent, &*self.clock)?;
        task.begin_transfer(&*self.clock)?;
        self.tasks.update_if(&task, guard).await?;
        if let Err(err) = self.transfers.store(&transfer).await {
            self.restore(task).await;
            return Err(err.into());
        }
        tracing::info!(
            transfer_id = %transfer.id(),
            task_id = %task_id,
            from = %transfer.from_user(),
            to = %to_user,
            "transfer initiated"
        );
        Ok(transfer)
    }

    /// Answers a handover addressed to the caller.
    ///
    /// On acceptance the task moves to the recipient with its remaining
    /// effort recomputed; subtasks held by the previous assignee then follow
    /// as a [`SecondaryEffect`].
    ///
    /// # Errors
    ///
    /// Returns [`TransferServiceError`] when the handover is missing or
    /// resolved, the caller is not its recipient, or the task changed
    /// concurrently.
    pub async fn respond(
        &self,
        actor: &Actor,
        transfer_id: TransferId,
        decision: TransferDecision,
    ) -> TransferServiceResult<TransferResolution> {
        let mut transfer = self.load(transfer_id).await?;
        transfer.ensure_pending()?;
        policy::transfer_recipient(actor, transfer.to_user())?;
        let pending = transfer.clone();
        let mut task = self.load_task(transfer.task_id()).await?;
        let guard = TaskGuard::of(&task);
        match decision {
            TransferDecision::Accept => {
                transfer.accept(&*self.clock)?;
                task.accept_transfer(transfer.to_user(), transfer.effort_spent(), &*self.clock)?;
            }
            TransferDecision::Reject => {
                transfer.reject(&*self.clock)?;
                task.revert_transfer(&*self.clock)?;
            }
        }
        self.commit(&pending, &transfer, &task, guard).await?;
        let cascade = match decision {
            TransferDecision::Accept => self.reassign_subtasks(&transfer).await,
            TransferDecision::Reject => SecondaryEffect::NotApplicable,
        };
        Ok(TransferResolution {
            transfer,
            task,
            cascade,
        })
    }

    /// Withdraws a handover the caller initiated.
    ///
    /// # Errors
    ///
    /// Returns [`TransferServiceError`] when the handover is missing or
    /// resolved, or the caller did not initiate it.
    pub async fn cancel(
        &self,
        actor: &Actor,
        transfer_id: TransferId,
    ) -> TransferServiceResult<TaskTransfer> {
        let mut transfer = self.load(transfer_id).await?;
        transfer.ensure_pending()?;
        policy::transfer_initiator(actor, transfer.from_user())?;
        let pending = transfer.clone();
        let mut task = self.load_task(transfer.task_id()).await?;
        let guard = TaskGuard::of(&task);
        transfer.cancel(&*self.clock)?;
        task.revert_transfer(&*self.clock)?;
        self.commit(&pending, &transfer, &task, guard).await?;
        Ok(transfer)
    }

    /// Lists pending handovers addressed to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TransferServiceError::Repository`] when the query fails.
    pub async fn pending_for(&self, actor: &Actor) -> TransferServiceResult<Vec<TaskTransfer>> {
        Ok(self
            .transfers
            .list_pending_for_recipient(actor.user_id())
            .await?)
    }

    /// Lists every handover recorded for a task.
    ///
    /// # Errors
    ///
    /// Returns [`TransferServiceError::Repository`] when the query fails.
    pub async fn history(&self, task_id: TaskId) -> TransferServiceResult<Vec<TaskTransfer>> {
        Ok(self.transfers.list_by_task(task_id).await?)
    }

    async fn load(&self, transfer_id: TransferId) -> TransferServiceResult<TaskTransfer> {
        self.transfers
            .find_by_id(transfer_id)
            .await?
            .ok_or(TransferServiceError::NotFound(transfer_id))
    }

    async fn load_task(&self, task_id: TaskId) -> TransferServiceResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TransferServiceError::TaskNotFound(task_id))
    }

    async fn commit(
        &self,
        pending: &TaskTransfer,
        transfer: &TaskTransfer,
        task: &Task,
        guard: TaskGuard,
    ) -> TransferServiceResult<()> {
        self.transfers.update_if_pending(transfer).await?;
        if let Err(err) = self.tasks.update_if(task, guard).await {
            if let Err(reopen_err) = self.transfers.reopen(pending).await {
                tracing::error!(
                    transfer_id = %transfer.id(),
                    error = %reopen_err,
                    "transfer left resolved after its task changed"
                );
            }
            return Err(err.into());
        }
        tracing::info!(
            transfer_id = %transfer.id(),
            task_id = %task.id(),
            status = %transfer.status(),
            "transfer resolved"
        );
        Ok(())
    }

    /// Puts a parked task back in progress after the handover row could not
    /// be stored.
    async fn restore(&self, mut task: Task) {
        let guard = TaskGuard::of(&task);
        if task.revert_transfer(&*self.clock).is_err() {
            return;
        }
        if let Err(err) = self.tasks.update_if(&task, guard).await {
            tracing::error!(
                task_id = %task.id(),
                error = %err,
                "task left pending transfer after failed handover write"
            );
        }
    }

    async fn reassign_subtasks(&self, transfer: &TaskTransfer) -> SecondaryEffect {
        match self
            .tasks
            .reassign_subtasks(
                transfer.task_id(),
                transfer.from_user(),
                transfer.to_user(),
                self.clock.utc(),
            )
            .await
        {
            Ok(count) => {
                tracing::debug!(task_id = %transfer.task_id(), count, "subtasks reassigned");
                SecondaryEffect::Applied { count }
            }
            Err(error) => {
                tracing::warn!(
                    task_id = %transfer.task_id(),
                    transfer_id = %transfer.id(),
                    error = %error,
                    "subtask reassignment failed after transfer accept"
                );
                SecondaryEffect::Failed { error }
            }
        }
    }
}
