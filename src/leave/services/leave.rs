//! Leave creation with deadline conflict detection.

use crate::access::{Actor, UserId};
use crate::calendar::{
    domain::{CalendarDomainError, DateRange},
    ports::{CalendarRepositoryError, HolidayRepository, LeaveCalendar},
    services::WorkingDayCalculator,
};
use crate::error::ErrorKind;
use crate::leave::{
    domain::{Leave, LeaveConflict, LeaveId},
    ports::{LeaveRepository, LeaveRepositoryError},
};
use crate::task::{
    domain::{Task, TaskStatus},
    ports::{TaskFilter, TaskRepository, TaskRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for leave operations.
#[derive(Debug, Error)]
pub enum LeaveServiceError {
    /// The requested dates are malformed.
    #[error(transparent)]
    Range(#[from] CalendarDomainError),
    /// The leave would make in-progress deadlines infeasible.
    #[error("leave conflicts with {} in-progress task(s)", .0.len())]
    ConflictingTasks(Vec<LeaveConflict>),
    /// The leave does not exist or belongs to someone else.
    #[error("leave not found: {0}")]
    NotFound(LeaveId),
    /// Leave storage failed.
    #[error(transparent)]
    Repository(#[from] LeaveRepositoryError),
    /// Working-day lookup failed.
    #[error(transparent)]
    Calendar(#[from] CalendarRepositoryError),
    /// Task lookup failed.
    #[error(transparent)]
    Task(#[from] TaskRepositoryError),
}

impl LeaveServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Range(_) => ErrorKind::Validation,
            Self::ConflictingTasks(_)
            | Self::Repository(LeaveRepositoryError::DuplicateLeave(_)) => ErrorKind::StateConflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Repository(LeaveRepositoryError::Persistence(_))
            | Self::Calendar(_)
            | Self::Task(_) => ErrorKind::Infrastructure,
        }
    }
}

/// Result type for leave service operations.
pub type LeaveServiceResult<T> = Result<T, LeaveServiceError>;

/// Records leave for the calling user.
///
/// The leave store doubles as the calculator's leave source, so leave
/// recorded here is immediately excluded from working-day counts.
#[derive(Clone)]
pub struct LeaveService<L, T, H, C>
where
    L: LeaveRepository + LeaveCalendar,
    T: TaskRepository,
    H: HolidayRepository,
    C: Clock + Send + Sync,
{
    leaves: Arc<L>,
    tasks: Arc<T>,
    calculator: WorkingDayCalculator<H, L>,
    clock: Arc<C>,
}

impl<L, T, H, C> LeaveService<L, T, H, C>
where
    L: LeaveRepository + LeaveCalendar,
    T: TaskRepository,
    H: HolidayRepository,
    C: Clock + Send + Sync,
{
    /// Creates a leave service.
    #[must_use]
    pub fn new(leaves: Arc<L>, tasks: Arc<T>, holidays: Arc<H>, clock: Arc<C>) -> Self {
        let calculator = WorkingDayCalculator::new(holidays, Arc::clone(&leaves));
        Self {
            leaves,
            tasks,
            calculator,
            clock,
        }
    }

    /// Requests leave for the caller over `[start, end]`.
    ///
    /// Each in-progress task assigned to the caller with a due date is
    /// checked: if the caller's working days from today to the deadline do
    /// not exceed those from the leave start to the deadline, the leave
    /// would consume every remaining day and the task is reported. Leave
    /// with no conflicts is approved immediately.
    ///
    /// # Errors
    ///
    /// Returns [`LeaveServiceError::Range`] when `end` precedes `start`,
    /// [`LeaveServiceError::ConflictingTasks`] listing every affected task,
    /// or a lookup error.
    pub async fn create(
        &self,
        actor: &Actor,
        start: NaiveDate,
        end: NaiveDate,
        reason: &str,
    ) -> LeaveServiceResult<Leave> {
        let period = DateRange::new(start, end)?;
        let conflicts = self.conflicts(actor.user_id(), period).await?;
        if !conflicts.is_empty() {
            tracing::info!(
                user_id = %actor.user_id(),
                conflicts = conflicts.len(),
                "leave refused"
            );
            return Err(LeaveServiceError::ConflictingTasks(conflicts));
        }
        let leave = Leave::approved(actor.user_id(), period, reason, &*self.clock);
        self.leaves.store(&leave).await?;
        tracing::debug!(
            leave_id = %leave.id(),
            user_id = %actor.user_id(),
            %period,
            "leave recorded"
        );
        Ok(leave)
    }

    /// Lists the caller's own leave, latest first.
    ///
    /// # Errors
    ///
    /// Returns [`LeaveServiceError::Repository`] when the query fails.
    pub async fn list(&self, actor: &Actor) -> LeaveServiceResult<Vec<Leave>> {
        Ok(self.leaves.list_by_user(actor.user_id()).await?)
    }

    /// Removes one of the caller's own leave records.
    ///
    /// # Errors
    ///
    /// Returns [`LeaveServiceError::NotFound`] when the leave does not exist
    /// or belongs to another user.
    pub async fn delete(&self, actor: &Actor, id: LeaveId) -> LeaveServiceResult<()> {
        if !self.leaves.delete_owned(id, actor.user_id()).await? {
            return Err(LeaveServiceError::NotFound(id));
        }
        tracing::debug!(leave_id = %id, user_id = %actor.user_id(), "leave deleted");
        Ok(())
    }

    async fn conflicts(
        &self,
        user_id: UserId,
        period: DateRange,
    ) -> LeaveServiceResult<Vec<LeaveConflict>> {
        let today = self.clock.utc().date_naive();
        let tasks = self
            .tasks
            .list(TaskFilter::AssignedWithStatus {
                assignee: user_id,
                status: TaskStatus::InProgress,
            })
            .await?;
        let mut conflicts = Vec::new();
        for task in tasks {
            let Some(due) = task.due_date() else {
                continue;
            };
            let during_leave = self
                .calculator
                .working_days_available(user_id, period.start(), due)
                .await?;
            let remaining = self
                .calculator
                .working_days_available(user_id, today, due)
                .await?;
            if remaining > 0 && remaining <= during_leave {
                conflicts.push(conflict_for(&task, due));
            }
        }
        Ok(conflicts)
    }
}

fn conflict_for(task: &Task, due_date: NaiveDate) -> LeaveConflict {
    LeaveConflict {
        task_id: task.id(),
        title: task.title().to_owned(),
        due_date,
    }
}
