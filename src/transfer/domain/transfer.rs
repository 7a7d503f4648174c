//! Handover record and its resolution rules.

use super::TransferDomainError;
use crate::access::UserId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a handover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferId(Uuid);

impl TransferId {
    /// Creates a new random handover identifier.
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

impl Default for TransferId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handover status. Every status other than `Pending` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    /// Awaiting the recipient's answer.
    Pending,
    /// The recipient took the task.
    Accepted,
    /// The recipient refused the task.
    Rejected,
    /// The initiator withdrew the offer.
    Cancelled,
}

impl TransferStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recipient's answer to a handover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferDecision {
    /// Take over the task.
    Accept,
    /// Leave the task with the initiator.
    Reject,
}

impl TryFrom<&str> for TransferDecision {
    type Error = TransferDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            _ => Err(TransferDomainError::UnknownDecision(value.to_owned())),
        }
    }
}

/// An offer to hand an in-progress task to another executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTransfer {
    id: TransferId,
    task_id: TaskId,
    from_user: UserId,
    to_user: UserId,
    effort_spent: u32,
    status: TransferStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskTransfer {
    /// Opens a pending handover.
    ///
    /// # Errors
    ///
    /// Returns [`TransferDomainError::SelfTransfer`] when `from_user` and
    /// `to_user` are the same.
    pub fn new(
        task_id: TaskId,
        from_user: UserId,
        to_user: UserId,
        effort_spent: u32,
        clock: &impl Clock,
    ) -> Result<Self, TransferDomainError> {
        if from_user == to_user {
            return Err(TransferDomainError::SelfTransfer { user_id: from_user });
        }
        let now = clock.utc();
        Ok(Self {
            id: TransferId::new(),
            task_id,
            from_user,
            to_user,
            effort_spent,
            status: TransferStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns the handover identifier.
    #[must_use]
    pub const fn id(&self) -> TransferId {
        self.id
    }

    /// Returns the task being handed over.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the initiating assignee.
    #[must_use]
    pub const fn from_user(&self) -> UserId {
        self.from_user
    }

    /// Returns the proposed recipient.
    #[must_use]
    pub const fn to_user(&self) -> UserId {
        self.to_user
    }

    /// Returns the effort the initiator already consumed.
    #[must_use]
    pub const fn effort_spent(&self) -> u32 {
        self.effort_spent
    }

    /// Returns the handover status.
    #[must_use]
    pub const fn status(&self) -> TransferStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the resolution or creation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Fails unless the handover is still open.
    ///
    /// # Errors
    ///
    /// Returns [`TransferDomainError::NotPending`] once resolved.
    pub const fn ensure_pending(&self) -> Result<(), TransferDomainError> {
        match self.status {
            TransferStatus::Pending => Ok(()),
            status => Err(TransferDomainError::NotPending {
                transfer_id: self.id,
                status,
            }),
        }
    }

    /// Marks the handover accepted.
    ///
    /// # Errors
    ///
    /// Returns [`TransferDomainError::NotPending`] once resolved.
    pub fn accept(&mut self, clock: &impl Clock) -> Result<(), TransferDomainError> {
        self.close(TransferStatus::Accepted, clock)
    }

    /// Marks the handover rejected by the recipient.
    ///
    /// # Errors
    ///
    /// Returns [`TransferDomainError::NotPending`] once resolved.
    pub fn reject(&mut self, clock: &impl Clock) -> Result<(), TransferDomainError> {
        self.close(TransferStatus::Rejected, clock)
    }

    /// Marks the handover withdrawn by the initiator.
    ///
    /// # Errors
    ///
    /// Returns [`TransferDomainError::NotPending`] once resolved.
    pub fn cancel(&mut self, clock: &impl Clock) -> Result<(), TransferDomainError> {
        self.close(TransferStatus::Cancelled, clock)
    }

    fn close(
        &mut self,
        outcome: TransferStatus,
        clock: &impl Clock,
    ) -> Result<(), TransferDomainError> {
        self.ensure_pending()?;
        self.status = outcome;
        self.updated_at = clock.utc();
        Ok(())
    }
}
