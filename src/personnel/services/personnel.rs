//! Load projection, performance metrics and the dashboard summary.

use crate::access::{AccessDenied, Actor, Operation, Role, UserId, policy};
use crate::calendar::{
    ports::{CalendarRepositoryError, HolidayRepository, LeaveCalendar},
    services::WorkingDayCalculator,
};
use crate::error::ErrorKind;
use crate::personnel::{
    domain::{
        ActiveTask, DashboardSummary, LoadReport, LoadThresholds, Member, PerformanceMetrics,
        PersonnelDomainError, daily_share,
    },
    ports::{MemberDirectory, PersonnelRepositoryError},
};
use crate::settings::{
    ports::SystemConfigRepository,
    services::{SettingsServiceError, SystemSettingsService},
};
use crate::task::{
    domain::{Task, TaskStatus},
    ports::{TaskFilter, TaskRepository, TaskRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for personnel views.
#[derive(Debug, Error)]
pub enum PersonnelServiceError {
    /// Value failed validation.
    #[error(transparent)]
    Domain(#[from] PersonnelDomainError),
    /// Caller may not perform the operation.
    #[error(transparent)]
    Access(#[from] AccessDenied),
    /// Directory operation failed.
    #[error(transparent)]
    Directory(#[from] PersonnelRepositoryError),
    /// Task lookup failed.
    #[error(transparent)]
    Task(#[from] TaskRepositoryError),
    /// Working-day lookup failed.
    #[error(transparent)]
    Calendar(#[from] CalendarRepositoryError),
    /// Capacity configuration could not be read.
    #[error(transparent)]
    Settings(#[from] SettingsServiceError),
}

impl PersonnelServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::Access(_) => ErrorKind::PermissionDenied,
            Self::Directory(PersonnelRepositoryError::MemberNotFound(_)) => ErrorKind::NotFound,
            Self::Settings(err) => err.kind(),
            Self::Directory(PersonnelRepositoryError::Persistence(_))
            | Self::Task(_)
            | Self::Calendar(_) => ErrorKind::Infrastructure,
        }
    }
}

/// Result type for personnel service operations.
pub type PersonnelServiceResult<T> = Result<T, PersonnelServiceError>;

/// Projects team load from in-progress tasks.
#[derive(Clone)]
pub struct PersonnelService<M, T, H, L, S, C>
where
    M: MemberDirectory,
    T: TaskRepository,
    H: HolidayRepository,
    L: LeaveCalendar,
    S: SystemConfigRepository,
    C: Clock + Send + Sync,
{
    members: Arc<M>,
    tasks: Arc<T>,
    calculator: WorkingDayCalculator<H, L>,
    settings: SystemSettingsService<S>,
    clock: Arc<C>,
    thresholds: LoadThresholds,
}

impl<M, T, H, L, S, C> PersonnelService<M, T, H, L, S, C>
where
    M: MemberDirectory,
    T: TaskRepository,
    H: HolidayRepository,
    L: LeaveCalendar,
    S: SystemConfigRepository,
    C: Clock + Send + Sync,
{
    /// Creates a personnel service with default thresholds.
    #[must_use]
    pub fn new(
        members: Arc<M>,
        tasks: Arc<T>,
        calculator: WorkingDayCalculator<H, L>,
        settings: SystemSettingsService<S>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            members,
            tasks,
            calculator,
            settings,
            clock,
            thresholds: LoadThresholds::default(),
        }
    }

    /// Replaces the status light thresholds.
    #[must_use]
    pub const fn with_thresholds(mut self, thresholds: LoadThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Projects today's load for every manager and executor.
    ///
    /// # Errors
    ///
    /// Returns [`PersonnelServiceError::Access`] unless the caller is
    /// management, or a lookup error.
    pub async fn load_reports(&self, actor: &Actor) -> PersonnelServiceResult<Vec<LoadReport>> {
        policy::privileged(actor, Operation::ViewPersonnel)?;
        let global_capacity = self.settings.daily_work_hours().await?;
        let today = self.clock.utc().date_naive();
        let mut reports = Vec::new();
        for member in self.members.list_active().await? {
            if !member.role().is_tracked_member() {
                continue;
            }
            reports.push(self.project(&member, today, global_capacity).await?);
        }
        Ok(reports)
    }

    /// Counts tasks awaiting review, pooled, and in progress.
    ///
    /// # Errors
    ///
    /// Returns [`PersonnelServiceError::Access`] unless the caller is
    /// management, or a lookup error.
    pub async fn dashboard_summary(
        &self,
        actor: &Actor,
    ) -> PersonnelServiceResult<DashboardSummary> {
        policy::privileged(actor, Operation::ViewPersonnel)?;
        Ok(DashboardSummary {
            pending_review: self.tasks.count_by_status(TaskStatus::PendingReview).await?,
            in_pool: self.tasks.count_by_status(TaskStatus::InPool).await?,
            in_progress: self.tasks.count_by_status(TaskStatus::InProgress).await?,
        })
    }

    /// Sets or clears a member's personal daily capacity.
    ///
    /// # Errors
    ///
    /// Returns [`PersonnelServiceError`] when the caller is not a system
    /// administrator, the member is unknown, or `hours` is not positive.
    pub async fn set_capacity(
        &self,
        actor: &Actor,
        user_id: UserId,
        hours: Option<f64>,
    ) -> PersonnelServiceResult<Member> {
        policy::administrator(actor, Operation::ManageCapacity)?;
        let mut member = self
            .members
            .find(user_id)
            .await?
            .ok_or(PersonnelRepositoryError::MemberNotFound(user_id))?;
        member.set_daily_capacity(hours)?;
        self.members.save(&member).await?;
        tracing::info!(user_id = %user_id, hours = ?hours, "daily capacity updated");
        Ok(member)
    }

    async fn project(
        &self,
        member: &Member,
        today: NaiveDate,
        global_capacity: f64,
    ) -> PersonnelServiceResult<LoadReport> {
        let tasks = self
            .tasks
            .list(TaskFilter::AssignedWithStatus {
                assignee: member.id(),
                status: TaskStatus::InProgress,
            })
            .await?;
        let mut load = 0.0;
        let mut has_overdue_task = false;
        for task in &tasks {
            let working_days = match task.due_date() {
                None => 0,
                Some(due) if due < today => {
                    has_overdue_task = true;
                    0
                }
                Some(due) => {
                    self.calculator
                        .working_days_available(member.id(), today, due)
                        .await?
                }
            };
            load += daily_share(task.effort(), working_days);
        }

        let capacity = member.effective_capacity(global_capacity);
        let performance = if member.role() == Role::Executor {
            self.performance(member.id()).await?
        } else {
            None
        };
        Ok(LoadReport {
            user_id: member.id(),
            real_name: member.real_name().to_owned(),
            role: member.role(),
            current_load_hours: load,
            daily_capacity_hours: capacity,
            load_percentage: load / capacity * 100.0,
            status_light: self.thresholds.classify(load),
            active_tasks: tasks.iter().map(active_task).collect(),
            has_overdue_task,
            performance,
        })
    }

    async fn performance(
        &self,
        user_id: UserId,
    ) -> PersonnelServiceResult<Option<PerformanceMetrics>> {
        let completed = self
            .tasks
            .list(TaskFilter::AssignedWithStatus {
                assignee: user_id,
                status: TaskStatus::Completed,
            })
            .await?;
        Ok(PerformanceMetrics::from_evaluations(
            completed.iter().filter_map(Task::evaluation),
        ))
    }
}

fn active_task(task: &Task) -> ActiveTask {
    ActiveTask {
        id: task.id(),
        title: task.title().to_owned(),
    }
}
