//! Task lifecycle orchestration.
//!
//! Every operation reads the task, captures a [`TaskGuard`], applies the
//! domain transition and writes back through
//! [`TaskRepository::update_if`]. A racing caller that changed the row in
//! between gets a conflict instead of silently overwriting.

use crate::access::{AccessDenied, Actor, EvaluationScope, Operation, UserId, policy};
use crate::error::ErrorKind;
use crate::task::{
    domain::{
        Approval, DifficultyRating, DifficultyScores, Evaluation, EvaluationScores, NewTask,
        Priority, SubtaskDraft, Task, TaskDetailsUpdate, TaskDomainError, TaskId, TaskStatus,
        TaskTypeId,
    },
    ports::{TaskGuard, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for approving a task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproveTaskRequest {
    effort: u32,
    priority: Priority,
    task_type: TaskTypeId,
    difficulty: Option<DifficultyScores>,
}

impl ApproveTaskRequest {
    /// Creates a request with the mandatory triage fields.
    #[must_use]
    pub const fn new(effort: u32, priority: Priority, task_type: TaskTypeId) -> Self {
        Self {
            effort,
            priority,
            task_type,
            difficulty: None,
        }
    }

    /// Attaches a difficulty assessment.
    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: DifficultyScores) -> Self {
        self.difficulty = Some(difficulty);
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or transition failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Caller may not perform the operation.
    #[error(transparent)]
    Access(#[from] AccessDenied),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

impl TaskLifecycleError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Access(_) => ErrorKind::PermissionDenied,
            Self::NotFound(_) | Self::Repository(TaskRepositoryError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::Repository(
                TaskRepositoryError::Conflict { .. } | TaskRepositoryError::DuplicateTask(_),
            ) => ErrorKind::StateConflict,
            Self::Repository(TaskRepositoryError::Persistence(_)) => ErrorKind::Infrastructure,
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a task awaiting review. Any authenticated role may do this.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the title is blank or the
    /// repository rejects persistence.
    pub async fn create(&self, actor: &Actor, draft: NewTask) -> TaskLifecycleResult<Task> {
        let task = Task::new(draft, actor.user_id(), &*self.clock)?;
        self.repository.store(&task).await?;
        tracing::debug!(task_id = %task.id(), creator = %actor, "task created");
        Ok(task)
    }

    /// Approves a task into the pool.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing, not pending
    /// review, the caller is not management, or the effort or difficulty
    /// scores are invalid.
    pub async fn approve(
        &self,
        actor: &Actor,
        task_id: TaskId,
        request: ApproveTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        let guard = TaskGuard::of(&task);
        task.ensure_transition(TaskStatus::PendingReview, TaskStatus::InPool)?;
        policy::privileged(actor, Operation::ApproveTask)?;
        let difficulty = request
            .difficulty
            .map(DifficultyRating::new)
            .transpose()
            .map_err(TaskDomainError::from)?;
        let approval = Approval {
            effort: request.effort,
            priority: request.priority,
            task_type: request.task_type,
            difficulty,
        };
        task.approve(actor.user_id(), approval, &*self.clock)?;
        self.commit(&task, guard).await?;
        Ok(task)
    }

    /// Rejects a task under review.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing, not pending
    /// review, or the caller is not management.
    pub async fn reject(
        &self,
        actor: &Actor,
        task_id: TaskId,
        reason: &str,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        let guard = TaskGuard::of(&task);
        task.ensure_transition(TaskStatus::PendingReview, TaskStatus::Rejected)?;
        policy::privileged(actor, Operation::RejectTask)?;
        task.reject(actor.user_id(), reason, &*self.clock)?;
        self.commit(&task, guard).await?;
        Ok(task)
    }

    /// Returns a rejected task to review.
    ///
    /// Ownership is checked before status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing, the caller is
    /// not its creator, or it is not rejected.
    pub async fn resubmit(&self, actor: &Actor, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        let guard = TaskGuard::of(&task);
        policy::resubmit(actor, task.creator_id())?;
        task.resubmit(&*self.clock)?;
        self.commit(&task, guard).await?;
        Ok(task)
    }

    /// Takes a pooled task for the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing, not pooled,
    /// reserved for someone else, claimed concurrently, or the caller's role
    /// may not claim.
    pub async fn claim(&self, actor: &Actor, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        let guard = TaskGuard::of(&task);
        task.ensure_transition(TaskStatus::InPool, TaskStatus::InProgress)?;
        policy::claim(actor)?;
        task.claim(actor.user_id(), &*self.clock)?;
        self.commit(&task, guard).await?;
        Ok(task)
    }

    /// Hands a pooled task to `assignee`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing, not pooled,
    /// changed concurrently, or the caller is not management.
    pub async fn assign(
        &self,
        actor: &Actor,
        task_id: TaskId,
        assignee: UserId,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        let guard = TaskGuard::of(&task);
        task.ensure_transition(TaskStatus::InPool, TaskStatus::InProgress)?;
        policy::privileged(actor, Operation::AssignTask)?;
        task.assign(assignee, actor.user_id(), &*self.clock)?;
        self.commit(&task, guard).await?;
        Ok(task)
    }

    /// Carves a pre-approved subtask out of an in-progress task.
    ///
    /// The budget check reads the current subtask total and does not lock
    /// the parent; two concurrent calls may both pass it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the parent is missing or not in
    /// progress, the caller is not its assignee, the budget would be
    /// exceeded, or the due date falls after the parent's.
    pub async fn create_subtask(
        &self,
        actor: &Actor,
        parent_id: TaskId,
        draft: SubtaskDraft,
    ) -> TaskLifecycleResult<Task> {
        let parent = self.load(parent_id).await?;
        parent.ensure_accepts_subtasks()?;
        policy::assignee(actor, Operation::CreateSubtask, parent.assignee_id())?;
        let allocated = self.repository.subtask_effort_total(parent_id).await?;
        parent.ensure_subtask_budget(allocated, draft.effort)?;
        let subtask = Task::new_subtask(&parent, draft, actor.user_id(), &*self.clock)?;
        self.repository.store(&subtask).await?;
        tracing::debug!(
            task_id = %subtask.id(),
            parent_id = %parent_id,
            effort = subtask.effort(),
            "subtask created"
        );
        Ok(subtask)
    }

    /// Submits the caller's task for evaluation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing, not in
    /// progress, not assigned to the caller, or is a main task with
    /// incomplete subtasks.
    pub async fn complete(&self, actor: &Actor, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        let guard = TaskGuard::of(&task);
        task.ensure_transition(TaskStatus::InProgress, TaskStatus::PendingEvaluation)?;
        policy::assignee(actor, Operation::CompleteTask, task.assignee_id())?;
        let incomplete = if task.is_main_task() {
            self.repository.count_incomplete_subtasks(task_id).await?
        } else {
            0
        };
        task.complete(incomplete, &*self.clock)?;
        self.commit(&task, guard).await?;
        Ok(task)
    }

    /// Scores a finished task and closes it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing, not pending
    /// evaluation, the caller may not evaluate it, or a score is not finite.
    pub async fn evaluate(
        &self,
        actor: &Actor,
        task_id: TaskId,
        scores: EvaluationScores,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        let guard = TaskGuard::of(&task);
        task.ensure_transition(TaskStatus::PendingEvaluation, TaskStatus::Completed)?;
        let scope = self.evaluation_scope(&task).await?;
        policy::evaluate(actor, scope)?;
        let evaluation = Evaluation::new(scores).map_err(TaskDomainError::from)?;
        task.evaluate(evaluation, &*self.clock)?;
        self.commit(&task, guard).await?;
        Ok(task)
    }

    /// Edits title, description, priority or remaining effort.
    ///
    /// A subtask's new effort must still fit its parent's budget, checked
    /// against the same snapshot as [`Self::create_subtask`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing, the caller
    /// may not edit it, the input is invalid, a subtask would exceed its
    /// parent's budget, or it changed concurrently.
    pub async fn update(
        &self,
        actor: &Actor,
        task_id: TaskId,
        update: TaskDetailsUpdate,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        let guard = TaskGuard::of(&task);
        policy::update(
            actor,
            task.creator_id(),
            task.status() == TaskStatus::Rejected,
        )?;
        if let Some(effort) = update.effort {
            self.ensure_revised_subtask_fits(&task, effort).await?;
        }
        task.update_details(update, &*self.clock)?;
        self.repository.update_if(&task, guard).await?;
        tracing::debug!(task_id = %task_id, "task details updated");
        Ok(task)
    }

    /// Removes a task. Its subtasks are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing or the caller
    /// may not delete it.
    pub async fn delete(&self, actor: &Actor, task_id: TaskId) -> TaskLifecycleResult<()> {
        let task = self.load(task_id).await?;
        let parent_assignee = match task.parent_id() {
            Some(parent_id) => self
                .repository
                .find_by_id(parent_id)
                .await?
                .and_then(|parent| parent.assignee_id()),
            None => None,
        };
        policy::delete(
            actor,
            task.creator_id(),
            task.status() == TaskStatus::Rejected,
            parent_assignee,
        )?;
        self.repository.delete(task_id).await?;
        tracing::debug!(task_id = %task_id, "task deleted");
        Ok(())
    }

    async fn load(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))
    }

    async fn ensure_revised_subtask_fits(
        &self,
        subtask: &Task,
        effort: u32,
    ) -> TaskLifecycleResult<()> {
        let Some(parent_id) = subtask.parent_id() else {
            return Ok(());
        };
        let Some(parent) = self.repository.find_by_id(parent_id).await? else {
            return Ok(());
        };
        let siblings = self
            .repository
            .subtask_effort_total(parent_id)
            .await?
            .saturating_sub(u64::from(subtask.effort()));
        parent.ensure_subtask_budget(siblings, effort)?;
        Ok(())
    }

    async fn evaluation_scope(&self, task: &Task) -> TaskLifecycleResult<EvaluationScope> {
        let Some(parent_id) = task.parent_id() else {
            return Ok(EvaluationScope::MainTask);
        };
        let parent_assignee = self
            .repository
            .find_by_id(parent_id)
            .await?
            .and_then(|parent| parent.assignee_id());
        Ok(EvaluationScope::Subtask { parent_assignee })
    }

    async fn commit(&self, task: &Task, guard: TaskGuard) -> TaskLifecycleResult<()> {
        self.repository.update_if(task, guard).await?;
        tracing::debug!(
            task_id = %task.id(),
            from = %guard.status,
            to = %task.status(),
            "task status changed"
        );
        Ok(())
    }
}
