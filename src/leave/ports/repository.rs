//! Leave repository port.

use crate::access::UserId;
use crate::leave::domain::{Leave, LeaveId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for leave repository operations.
pub type LeaveRepositoryResult<T> = Result<T, LeaveRepositoryError>;

/// Errors returned by leave repositories.
#[derive(Debug, Clone, Error)]
pub enum LeaveRepositoryError {
    /// A leave with the same identifier already exists.
    #[error("duplicate leave identifier: {0}")]
    DuplicateLeave(LeaveId),

    /// Persistence failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl LeaveRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Leave persistence contract.
#[async_trait]
pub trait LeaveRepository: Send + Sync {
    /// Stores a new leave.
    ///
    /// # Errors
    ///
    /// Returns [`LeaveRepositoryError::DuplicateLeave`] when the identifier
    /// already exists.
    async fn store(&self, leave: &Leave) -> LeaveRepositoryResult<()>;

    /// Lists a user's leave, latest start first.
    async fn list_by_user(&self, user_id: UserId) -> LeaveRepositoryResult<Vec<Leave>>;

    /// Finds a leave by identifier.
    async fn find_by_id(&self, id: LeaveId) -> LeaveRepositoryResult<Option<Leave>>;

    /// Removes a leave only if `owner` holds it.
    ///
    /// Returns `false` when no such leave exists for that owner.
    async fn delete_owned(&self, id: LeaveId, owner: UserId) -> LeaveRepositoryResult<bool>;
}
