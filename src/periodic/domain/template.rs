//! Recurring task template.

use super::{CronSchedule, PeriodicDomainError};
use crate::access::UserId;
use crate::task::domain::{Priority, ScheduledTaskDraft, Task, TaskDomainError, TaskTypeId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a recurring template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodicTaskId(Uuid);

impl PeriodicTaskId {
    /// Creates a new random template identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for PeriodicTaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PeriodicTaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Editable template fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDraft {
    /// Title; each materialized task appends its date.
    pub title: String,
    /// Description copied to each task.
    #[serde(default)]
    pub description: String,
    /// When to materialize.
    pub cron_expression: String,
    /// Executor each task is reserved for.
    #[serde(default)]
    pub default_assignee: Option<UserId>,
    /// Effort of each task, in hours.
    pub default_effort: u32,
    /// Priority of each task.
    pub default_priority: Priority,
    /// Category of each task.
    #[serde(default)]
    pub default_task_type: Option<TaskTypeId>,
    /// First day tasks may be produced.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day tasks may be produced.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Where a day falls relative to a template's activity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPosition {
    /// Before the start date.
    BeforeStart,
    /// Inside the window, or no window set.
    Open,
    /// After the end date.
    AfterEnd,
}

/// A template that produces a pooled task on every cron firing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicTask {
    id: PeriodicTaskId,
    title: String,
    description: String,
    #[serde(with = "cron_text")]
    schedule: CronSchedule,
    default_assignee: Option<UserId>,
    default_effort: u32,
    default_priority: Priority,
    default_task_type: Option<TaskTypeId>,
    is_active: bool,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    created_by: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PeriodicTask {
    /// Creates a template from a validated draft.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodicDomainError`] when the cron expression is invalid,
    /// the title is blank, the effort is zero, or the window is inverted.
    pub fn new(
        draft: TemplateDraft,
        is_active: bool,
        created_by: UserId,
        clock: &impl Clock,
    ) -> Result<Self, PeriodicDomainError> {
        let fields = ValidatedDraft::try_from(draft)?;
        let now = clock.utc();
        Ok(Self {
            id: PeriodicTaskId::new(),
            title: fields.title,
            description: fields.description,
            schedule: fields.schedule,
            default_assignee: fields.default_assignee,
            default_effort: fields.default_effort,
            default_priority: fields.default_priority,
            default_task_type: fields.default_task_type,
            is_active,
            start_date: fields.start_date,
            end_date: fields.end_date,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns the template identifier.
    #[must_use]
    pub const fn id(&self) -> PeriodicTaskId {
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

    /// Returns the schedule.
    #[must_use]
    pub const fn schedule(&self) -> &CronSchedule {
        &self.schedule
    }

    /// Returns the reserved executor, if any.
    #[must_use]
    pub const fn default_assignee(&self) -> Option<UserId> {
        self.default_assignee
    }

    /// Returns the default effort.
    #[must_use]
    pub const fn default_effort(&self) -> u32 {
        self.default_effort
    }

    /// Returns the default priority.
    #[must_use]
    pub const fn default_priority(&self) -> Priority {
        self.default_priority
    }

    /// Returns the default task type.
    #[must_use]
    pub const fn default_task_type(&self) -> Option<TaskTypeId> {
        self.default_task_type
    }

    /// Returns whether the template has a live trigger.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the first active day.
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Returns the last active day.
    #[must_use]
    pub const fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Returns the template author.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest change timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the editable fields. Activation is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodicDomainError`] under the same rules as
    /// [`PeriodicTask::new`]; the template is untouched on error.
    pub fn revise(
        &mut self,
        draft: TemplateDraft,
        clock: &impl Clock,
    ) -> Result<(), PeriodicDomainError> {
        let fields = ValidatedDraft::try_from(draft)?;
        self.title = fields.title;
        self.description = fields.description;
        self.schedule = fields.schedule;
        self.default_assignee = fields.default_assignee;
        self.default_effort = fields.default_effort;
        self.default_priority = fields.default_priority;
        self.default_task_type = fields.default_task_type;
        self.start_date = fields.start_date;
        self.end_date = fields.end_date;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Turns the trigger on or off.
    pub fn set_active(&mut self, active: bool, clock: &impl Clock) {
        self.is_active = active;
        self.updated_at = clock.utc();
    }

    /// Locates `today` relative to the activity window.
    #[must_use]
    pub fn window_position(&self, today: NaiveDate) -> WindowPosition {
        if self.start_date.is_some_and(|start| today < start) {
            WindowPosition::BeforeStart
        } else if self.end_date.is_some_and(|end| today > end) {
            WindowPosition::AfterEnd
        } else {
            WindowPosition::Open
        }
    }

    /// Produces today's pooled task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] if the stored defaults no longer form a
    /// valid task.
    pub fn materialize(
        &self,
        today: NaiveDate,
        clock: &impl Clock,
    ) -> Result<Task, TaskDomainError> {
        Task::new_scheduled(
            ScheduledTaskDraft {
                title: format!("{} - {}", self.title, today.format("%Y-%m-%d")),
                description: self.description.clone(),
                effort: self.default_effort,
                priority: self.default_priority,
                task_type: self.default_task_type,
                creator: self.created_by,
                assignee: self.default_assignee,
            },
            clock,
        )
    }
}

struct ValidatedDraft {
    title: String,
    description: String,
    schedule: CronSchedule,
    default_assignee: Option<UserId>,
    default_effort: u32,
    default_priority: Priority,
    default_task_type: Option<TaskTypeId>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl TryFrom<TemplateDraft> for ValidatedDraft {
    type Error = PeriodicDomainError;

    fn try_from(draft: TemplateDraft) -> Result<Self, Self::Error> {
        let schedule = CronSchedule::parse(&draft.cron_expression)?;
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(PeriodicDomainError::EmptyTitle);
        }
        if draft.default_effort == 0 {
            return Err(PeriodicDomainError::ZeroEffort);
        }
        if let (Some(start), Some(end)) = (draft.start_date, draft.end_date)
            && end < start
        {
            return Err(PeriodicDomainError::InvalidWindow { start, end });
        }
        Ok(Self {
            title: title.to_owned(),
            description: draft.description,
            schedule,
            default_assignee: draft.default_assignee,
            default_effort: draft.default_effort,
            default_priority: draft.default_priority,
            default_task_type: draft.default_task_type,
            start_date: draft.start_date,
            end_date: draft.end_date,
        })
    }
}

mod cron_text {
    use super::CronSchedule;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub(super) fn serialize<S: Serializer>(
        schedule: &CronSchedule,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(schedule.expression())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<CronSchedule, D::Error> {
        let text = String::deserialize(deserializer)?;
        CronSchedule::parse(&text).map_err(D::Error::custom)
    }
}
