//! Error types for handover validation.

use super::{TransferId, TransferStatus};
use crate::access::UserId;
use crate::error::ErrorKind;
use thiserror::Error;

/// Errors returned by handover domain rules.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransferDomainError {
    /// The initiator named themselves as recipient.
    #[error("cannot transfer a task to its current assignee {user_id}")]
    SelfTransfer {
        /// The initiating user.
        user_id: UserId,
    },

    /// The handover has already been resolved.
    #[error("transfer {transfer_id} is {status}, not pending")]
    NotPending {
        /// Handover identifier.
        transfer_id: TransferId,
        /// Resolved status.
        status: TransferStatus,
    },

    /// A response action was neither accept nor reject.
    #[error("unknown transfer decision: {0}")]
    UnknownDecision(String),
}

impl TransferDomainError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SelfTransfer { .. } | Self::UnknownDecision(_) => ErrorKind::Validation,
            Self::NotPending { .. } => ErrorKind::StateConflict,
        }
    }
}
