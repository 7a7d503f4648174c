//! Handover repository port.

use crate::access::UserId;
use crate::task::domain::TaskId;
use crate::transfer::domain::{TaskTransfer, TransferId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for handover repository operations.
pub type TransferRepositoryResult<T> = Result<T, TransferRepositoryError>;

/// Errors returned by handover repositories.
#[derive(Debug, Clone, Error)]
pub enum TransferRepositoryError {
    /// A handover with the same identifier already exists.
    #[error("duplicate transfer identifier: {0}")]
    DuplicateTransfer(TransferId),

    /// The handover was not found.
    #[error("transfer not found: {0}")]
    NotFound(TransferId),

    /// The stored handover was resolved by another caller.
    #[error("transfer {0} is no longer pending")]
    NotPending(TransferId),

    /// Persistence failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TransferRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Handover persistence contract.
#[async_trait]
pub trait TransferRepository: Send + Sync {
    /// Stores a new handover.
    ///
    /// # Errors
    ///
    /// Returns [`TransferRepositoryError::DuplicateTransfer`] when the
    /// identifier already exists.
    async fn store(&self, transfer: &TaskTransfer) -> TransferRepositoryResult<()>;

    /// Replaces a handover only while the stored copy is still pending.
    ///
    /// # Errors
    ///
    /// Returns [`TransferRepositoryError::NotFound`] when absent and
    /// [`TransferRepositoryError::NotPending`] when already resolved.
    async fn update_if_pending(&self, transfer: &TaskTransfer) -> TransferRepositoryResult<()>;

    /// Writes a pending snapshot back over a handover resolved by this
    /// caller whose task could not follow.
    ///
    /// # Errors
    ///
    /// Returns [`TransferRepositoryError::NotFound`] when absent.
    async fn reopen(&self, pending: &TaskTransfer) -> TransferRepositoryResult<()>;

    /// Finds a handover by identifier.
    async fn find_by_id(&self, id: TransferId) -> TransferRepositoryResult<Option<TaskTransfer>>;

    /// Lists every handover recorded for a task, oldest first.
    async fn list_by_task(&self, task_id: TaskId) -> TransferRepositoryResult<Vec<TaskTransfer>>;

    /// Lists pending handovers addressed to `recipient`, oldest first.
    async fn list_pending_for_recipient(
        &self,
        recipient: UserId,
    ) -> TransferRepositoryResult<Vec<TaskTransfer>>;
}
