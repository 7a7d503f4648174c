//! Task aggregate root.

use super::{
    DifficultyRating, Evaluation, Priority, TaskDomainError, TaskId, TaskStatus, TaskTypeId,
};
use crate::access::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Intake data for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Short summary.
    pub title: String,
    /// Free-form details.
    pub description: String,
    /// Optional deadline.
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    /// Creates intake data with a title and no description or deadline.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Triage decisions recorded when a task is approved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Approval {
    /// Estimated effort in hours.
    pub effort: u32,
    /// Assigned urgency.
    pub priority: Priority,
    /// Task category.
    pub task_type: TaskTypeId,
    /// Optional difficulty assessment.
    pub difficulty: Option<DifficultyRating>,
}

/// Data for a subtask carved out of an in-progress task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtaskDraft {
    /// Short summary.
    pub title: String,
    /// Free-form details.
    pub description: String,
    /// Share of the parent's budget, in hours.
    pub effort: u32,
    /// Deadline; the parent's deadline when omitted.
    pub due_date: Option<NaiveDate>,
}

/// Data for a task produced by a recurring template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTaskDraft {
    /// Title including the materialization date.
    pub title: String,
    /// Free-form details.
    pub description: String,
    /// Effort in hours.
    pub effort: u32,
    /// Urgency.
    pub priority: Priority,
    /// Task category, if the template names one.
    pub task_type: Option<TaskTypeId>,
    /// Template author, recorded as creator.
    pub creator: UserId,
    /// Executor the task is reserved for, if any.
    pub assignee: Option<UserId>,
}

/// Editable task details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetailsUpdate {
    /// New title.
    pub title: String,
    /// New description.
    pub description: String,
    /// New priority; unchanged when `None`.
    pub priority: Option<Priority>,
    /// New remaining effort; unchanged when `None`.
    pub effort: Option<u32>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    status: TaskStatus,
    priority: Option<Priority>,
    effort: u32,
    original_effort: Option<u32>,
    task_type: Option<TaskTypeId>,
    creator_id: UserId,
    reviewer_id: Option<UserId>,
    assignee_id: Option<UserId>,
    parent_id: Option<TaskId>,
    due_date: Option<NaiveDate>,
    rejection_reason: Option<String>,
    evaluation: Option<Evaluation>,
    difficulty: Option<DifficultyRating>,
    created_at: DateTime<Utc>,
    approved_at: Option<DateTime<Utc>>,
    claimed_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: Option<Priority>,
    /// Persisted remaining effort.
    pub effort: u32,
    /// Persisted baseline effort.
    pub original_effort: Option<u32>,
    /// Persisted task category.
    pub task_type: Option<TaskTypeId>,
    /// Persisted creator.
    pub creator_id: UserId,
    /// Persisted reviewer.
    pub reviewer_id: Option<UserId>,
    /// Persisted assignee.
    pub assignee_id: Option<UserId>,
    /// Persisted parent reference.
    pub parent_id: Option<TaskId>,
    /// Persisted deadline.
    pub due_date: Option<NaiveDate>,
    /// Persisted rejection reason.
    pub rejection_reason: Option<String>,
    /// Persisted evaluation.
    pub evaluation: Option<Evaluation>,
    /// Persisted difficulty rating.
    pub difficulty: Option<DifficultyRating>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted approval timestamp.
    pub approved_at: Option<DateTime<Utc>>,
    /// Persisted claim timestamp.
    pub claimed_at: Option<DateTime<Utc>>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted latest change timestamp.
    pub updated_at: DateTime<Utc>,
}

fn validated_title(title: &str) -> Result<String, TaskDomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

const fn validated_effort(effort: u32) -> Result<u32, TaskDomainError> {
    if effort == 0 {
        return Err(TaskDomainError::ZeroEffort);
    }
    Ok(effort)
}

impl Task {
    fn blank(title: String, description: String, creator_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: TaskId::new(),
            title,
            description,
            status: TaskStatus::PendingReview,
            priority: None,
            effort: 0,
            original_effort: None,
            task_type: None,
            creator_id,
            reviewer_id: None,
            assignee_id: None,
            parent_id: None,
            due_date: None,
            rejection_reason: None,
            evaluation: None,
            difficulty: None,
            created_at: now,
            approved_at: None,
            claimed_at: None,
            completed_at: None,
            updated_at: now,
        }
    }

    /// Creates a task awaiting review.
    ///
    /// Effort, priority and type are left for the reviewer.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(
        draft: NewTask,
        creator: UserId,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let title = validated_title(&draft.title)?;
        let mut task = Self::blank(title, draft.description, creator, clock.utc());
        task.due_date = draft.due_date;
        Ok(task)
    }

    /// Creates a pre-approved subtask in the pool.
    ///
    /// The subtask inherits the parent's priority and type. Budget checks
    /// against sibling subtasks are made with
    /// [`Task::ensure_subtask_budget`] before calling this.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the parent is not in progress, the
    /// title is blank, the effort is zero, or the due date falls after the
    /// parent's.
    pub fn new_subtask(
        parent: &Self,
        draft: SubtaskDraft,
        creator: UserId,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        parent.ensure_accepts_subtasks()?;
        let title = validated_title(&draft.title)?;
        let effort = validated_effort(draft.effort)?;
        let due_date = draft.due_date.or(parent.due_date);
        if let (Some(due), Some(parent_due)) = (due_date, parent.due_date)
            && due > parent_due
        {
            return Err(TaskDomainError::SubtaskDueAfterParent {
                due_date: due,
                parent_due_date: parent_due,
            });
        }

        let now = clock.utc();
        let mut task = Self::blank(title, draft.description, creator, now);
        task.status = TaskStatus::InPool;
        task.priority = parent.priority;
        task.task_type = parent.task_type;
        task.effort = effort;
        task.original_effort = Some(effort);
        task.parent_id = Some(parent.id);
        task.due_date = due_date;
        task.approved_at = Some(now);
        Ok(task)
    }

    /// Creates a pre-approved task from a recurring template.
    ///
    /// The task enters the pool directly; a default assignee, when given,
    /// reserves it for that executor.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the title is blank or the effort is
    /// zero.
    pub fn new_scheduled(
        draft: ScheduledTaskDraft,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let title = validated_title(&draft.title)?;
        let effort = validated_effort(draft.effort)?;
        let now = clock.utc();
        let mut task = Self::blank(title, draft.description, draft.creator, now);
        task.status = TaskStatus::InPool;
        task.priority = Some(draft.priority);
        task.task_type = draft.task_type;
        task.effort = effort;
        task.original_effort = Some(effort);
        task.assignee_id = draft.assignee;
        task.approved_at = Some(now);
        Ok(task)
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            effort: data.effort,
            original_effort: data.original_effort,
            task_type: data.task_type,
            creator_id: data.creator_id,
            reviewer_id: data.reviewer_id,
            assignee_id: data.assignee_id,
            parent_id: data.parent_id,
            due_date: data.due_date,
            rejection_reason: data.rejection_reason,
            evaluation: data.evaluation,
            difficulty: data.difficulty,
            created_at: data.created_at,
            approved_at: data.approved_at,
            claimed_at: data.claimed_at,
            completed_at: data.completed_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority, set at approval.
    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the remaining effort in hours.
    #[must_use]
    pub const fn effort(&self) -> u32 {
        self.effort
    }

    /// Returns the effort fixed at approval.
    #[must_use]
    pub const fn original_effort(&self) -> Option<u32> {
        self.original_effort
    }

    /// Returns the task category, set at approval.
    #[must_use]
    pub const fn task_type(&self) -> Option<TaskTypeId> {
        self.task_type
    }

    /// Returns the creator.
    #[must_use]
    pub const fn creator_id(&self) -> UserId {
        self.creator_id
    }

    /// Returns the reviewer or assigning manager.
    #[must_use]
    pub const fn reviewer_id(&self) -> Option<UserId> {
        self.reviewer_id
    }

    /// Returns the current assignee.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    /// Returns the parent task for subtasks.
    #[must_use]
    pub const fn parent_id(&self) -> Option<TaskId> {
        self.parent_id
    }

    /// Returns `true` when the task has no parent.
    #[must_use]
    pub const fn is_main_task(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the reason given at the latest rejection.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    /// Returns the evaluation of a completed task.
    #[must_use]
    pub const fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    /// Returns the difficulty rating recorded at approval.
    #[must_use]
    pub const fn difficulty(&self) -> Option<&DifficultyRating> {
        self.difficulty.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the approval timestamp.
    #[must_use]
    pub const fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    /// Returns the claim or assignment timestamp.
    #[must_use]
    pub const fn claimed_at(&self) -> Option<DateTime<Utc>> {
        self.claimed_at
    }

    /// Returns the completion timestamp.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the latest change timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Checks that the task is in `from` and that `from -> to` is an edge
    /// of the status graph.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] otherwise.
    pub fn ensure_transition(
        &self,
        from: TaskStatus,
        to: TaskStatus,
    ) -> Result<(), TaskDomainError> {
        if self.status == from && from.can_transition_to(to) {
            return Ok(());
        }
        Err(TaskDomainError::InvalidStateTransition {
            task_id: self.id,
            from: self.status,
            to,
        })
    }

    /// Checks that subtasks may be carved from this task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ParentNotInProgress`] unless the task is
    /// in progress.
    pub fn ensure_accepts_subtasks(&self) -> Result<(), TaskDomainError> {
        if self.status == TaskStatus::InProgress {
            return Ok(());
        }
        Err(TaskDomainError::ParentNotInProgress {
            parent_id: self.id,
            status: self.status,
        })
    }

    /// Checks that `requested` more hours fit in the budget left after
    /// `allocated` hours of existing subtasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::SubtaskBudgetExceeded`] when the sum would
    /// exceed the original effort.
    pub fn ensure_subtask_budget(
        &self,
        allocated: u64,
        requested: u32,
    ) -> Result<(), TaskDomainError> {
        let budget = u64::from(self.original_effort.unwrap_or(0));
        let remaining = budget.saturating_sub(allocated);
        if u64::from(requested) > remaining {
            return Err(TaskDomainError::SubtaskBudgetExceeded {
                parent_id: self.id,
                requested,
                remaining,
            });
        }
        Ok(())
    }

    /// Approves the task into the pool.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the task is not pending review or
    /// the effort is zero.
    pub fn approve(
        &mut self,
        reviewer: UserId,
        approval: Approval,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::PendingReview, TaskStatus::InPool)?;
        let effort = validated_effort(approval.effort)?;
        let now = clock.utc();
        self.effort = effort;
        self.original_effort = Some(effort);
        self.priority = Some(approval.priority);
        self.task_type = Some(approval.task_type);
        self.difficulty = approval.difficulty;
        self.reviewer_id = Some(reviewer);
        self.approved_at = Some(now);
        self.status = TaskStatus::InPool;
        self.updated_at = now;
        Ok(())
    }

    /// Sends the task back to its creator.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task
    /// is pending review.
    pub fn reject(
        &mut self,
        reviewer: UserId,
        reason: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::PendingReview, TaskStatus::Rejected)?;
        self.rejection_reason = Some(reason.into().trim().to_owned());
        self.reviewer_id = Some(reviewer);
        self.move_to(TaskStatus::Rejected, clock);
        Ok(())
    }

    /// Returns a rejected task to review.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task
    /// is rejected.
    pub fn resubmit(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::Rejected, TaskStatus::PendingReview)?;
        self.move_to(TaskStatus::PendingReview, clock);
        Ok(())
    }

    /// Takes the task from the pool.
    ///
    /// A task reserved for the claimant may be claimed; one reserved for
    /// anyone else may not.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the task is not pooled or is
    /// reserved for another executor.
    pub fn claim(&mut self, claimant: UserId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::InPool, TaskStatus::InProgress)?;
        if let Some(assignee) = self.assignee_id.filter(|existing| *existing != claimant) {
            return Err(TaskDomainError::AlreadyAssigned {
                task_id: self.id,
                assignee,
            });
        }
        self.assignee_id = Some(claimant);
        self.claimed_at = Some(clock.utc());
        self.move_to(TaskStatus::InProgress, clock);
        Ok(())
    }

    /// Hands a pooled task to an executor on a manager's behalf.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task
    /// is pooled.
    pub fn assign(
        &mut self,
        assignee: UserId,
        manager: UserId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::InPool, TaskStatus::InProgress)?;
        self.assignee_id = Some(assignee);
        self.reviewer_id = Some(manager);
        self.claimed_at = Some(clock.utc());
        self.move_to(TaskStatus::InProgress, clock);
        Ok(())
    }

    /// Submits the task for evaluation.
    ///
    /// A main task may only complete once `incomplete_subtasks` is zero.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the task is not in progress or a
    /// main task still has open subtasks.
    pub fn complete(
        &mut self,
        incomplete_subtasks: u64,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::InProgress, TaskStatus::PendingEvaluation)?;
        if self.is_main_task() && incomplete_subtasks > 0 {
            return Err(TaskDomainError::IncompleteSubtasks {
                task_id: self.id,
                count: incomplete_subtasks,
            });
        }
        self.move_to(TaskStatus::PendingEvaluation, clock);
        Ok(())
    }

    /// Records the evaluation and closes the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task
    /// is pending evaluation.
    pub fn evaluate(
        &mut self,
        evaluation: Evaluation,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::PendingEvaluation, TaskStatus::Completed)?;
        self.evaluation = Some(evaluation);
        self.completed_at = Some(clock.utc());
        self.move_to(TaskStatus::Completed, clock);
        Ok(())
    }

    /// Parks the task while a handover is outstanding.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task
    /// is in progress.
    pub fn begin_transfer(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::InProgress, TaskStatus::PendingTransfer)?;
        self.move_to(TaskStatus::PendingTransfer, clock);
        Ok(())
    }

    /// Resumes work with the same assignee after a refused or withdrawn
    /// handover.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless a handover
    /// is outstanding.
    pub fn revert_transfer(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::PendingTransfer, TaskStatus::InProgress)?;
        self.move_to(TaskStatus::InProgress, clock);
        Ok(())
    }

    /// Completes a handover to `new_assignee`.
    ///
    /// Remaining effort becomes the original effort less what the previous
    /// assignee already spent, floored at zero.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless a handover
    /// is outstanding.
    pub fn accept_transfer(
        &mut self,
        new_assignee: UserId,
        effort_spent: u32,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::PendingTransfer, TaskStatus::InProgress)?;
        let baseline = self.original_effort.unwrap_or(self.effort);
        self.effort = baseline.saturating_sub(effort_spent);
        self.assignee_id = Some(new_assignee);
        self.move_to(TaskStatus::InProgress, clock);
        Ok(())
    }

    /// Moves the assignment to another user without touching status.
    ///
    /// Used when a parent's handover cascades to its subtasks.
    pub const fn reassign(&mut self, assignee: UserId, at: DateTime<Utc>) {
        self.assignee_id = Some(assignee);
        self.updated_at = at;
    }

    /// Replaces the editable details.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the title is blank or the effort is
    /// zero.
    pub fn update_details(
        &mut self,
        update: TaskDetailsUpdate,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let title = validated_title(&update.title)?;
        let effort = update.effort.map(validated_effort).transpose()?;
        self.title = title;
        self.description = update.description;
        if let Some(priority) = update.priority {
            self.priority = Some(priority);
        }
        if let Some(effort) = effort {
            self.effort = effort;
        }
        self.updated_at = clock.utc();
        Ok(())
    }

    fn move_to(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.updated_at = clock.utc();
    }
}
