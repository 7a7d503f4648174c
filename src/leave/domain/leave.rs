//! Leave aggregate and conflict report.

use crate::access::UserId;
use crate::calendar::domain::DateRange;
use crate::task::domain::TaskId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a leave record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaveId(Uuid);

impl LeaveId {
    /// Creates a new random leave identifier.
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

impl Default for LeaveId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LeaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Leave approval status.
///
/// Leave that passes conflict detection is approved on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// The leave counts against working days.
    Approved,
}

impl LeaveStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
        }
    }
}

impl TryFrom<&str> for LeaveStatus {
    type Error = ParseLeaveStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "approved" => Ok(Self::Approved),
            _ => Err(ParseLeaveStatusError(value.to_owned())),
        }
    }
}

/// Error returned while parsing leave statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown leave status: {0}")]
pub struct ParseLeaveStatusError(pub String);

/// A date range during which a user does not work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leave {
    id: LeaveId,
    user_id: UserId,
    period: DateRange,
    reason: String,
    status: LeaveStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Leave {
    /// Creates an approved leave.
    #[must_use]
    pub fn approved(
        user_id: UserId,
        period: DateRange,
        reason: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        let now = clock.utc();
        Self {
            id: LeaveId::new(),
            user_id,
            period,
            reason: reason.into(),
            status: LeaveStatus::Approved,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the leave identifier.
    #[must_use]
    pub const fn id(&self) -> LeaveId {
        self.id
    }

    /// Returns the user on leave.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the inclusive date range.
    #[must_use]
    pub const fn period(&self) -> DateRange {
        self.period
    }

    /// Returns the stated reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the approval status.
    #[must_use]
    pub const fn status(&self) -> LeaveStatus {
        self.status
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
}

/// A task whose deadline the requested leave would make infeasible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveConflict {
    /// Conflicting task.
    pub task_id: TaskId,
    /// Task title.
    pub title: String,
    /// Task deadline.
    pub due_date: NaiveDate,
}

impl fmt::Display for LeaveConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' (due {})", self.title, self.due_date)
    }
}
