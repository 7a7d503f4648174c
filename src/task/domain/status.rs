//! Task status graph and priority.

use super::{ParsePriorityError, ParseTaskStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// The permitted edges are:
///
/// ```text
/// pending_review -> in_pool | rejected
/// rejected -> pending_review
/// in_pool -> in_progress
/// in_progress -> pending_transfer | pending_evaluation
/// pending_transfer -> in_progress
/// pending_evaluation -> completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Awaiting triage by a manager.
    PendingReview,
    /// Sent back to the creator; may be resubmitted.
    Rejected,
    /// Approved and waiting for an executor.
    InPool,
    /// Being worked on by the assignee.
    InProgress,
    /// A handover to another executor is outstanding.
    PendingTransfer,
    /// Finished by the assignee and awaiting scores.
    PendingEvaluation,
    /// Evaluated; terminal.
    Completed,
}

impl TaskStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 7] = [
        Self::PendingReview,
        Self::Rejected,
        Self::InPool,
        Self::InProgress,
        Self::PendingTransfer,
        Self::PendingEvaluation,
        Self::Completed,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingReview => "pending_review",
            Self::Rejected => "rejected",
            Self::InPool => "in_pool",
            Self::InProgress => "in_progress",
            Self::PendingTransfer => "pending_transfer",
            Self::PendingEvaluation => "pending_evaluation",
            Self::Completed => "completed",
        }
    }

    /// Returns `true` when `target` is a permitted next status.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::PendingReview, Self::InPool | Self::Rejected)
                | (Self::Rejected, Self::PendingReview)
                | (Self::InPool | Self::PendingTransfer, Self::InProgress)
                | (
                    Self::InProgress,
                    Self::PendingTransfer | Self::PendingEvaluation
                )
                | (Self::PendingEvaluation, Self::Completed)
        )
    }

    /// Returns `true` for the terminal status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseTaskStatusError(value.to_owned()))
    }
}

/// Task urgency assigned at approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal scheduling.
    Medium,
    /// Should be picked up soon.
    High,
    /// Must be picked up immediately.
    Urgent,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}
