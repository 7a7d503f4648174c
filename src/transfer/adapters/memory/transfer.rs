//! In-memory handover store.

use crate::access::UserId;
use crate::task::domain::TaskId;
use crate::transfer::{
    domain::{TaskTransfer, TransferId, TransferStatus},
    ports::{TransferRepository, TransferRepositoryError, TransferRepositoryResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory handover repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransferRepository {
    state: Arc<RwLock<HashMap<TransferId, TaskTransfer>>>,
}

impl InMemoryTransferRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn select(
        &self,
        predicate: impl Fn(&TaskTransfer) -> bool,
    ) -> TransferRepositoryResult<Vec<TaskTransfer>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut transfers: Vec<TaskTransfer> =
            state.values().filter(|t| predicate(t)).cloned().collect();
        transfers.sort_by_key(TaskTransfer::created_at);
        Ok(transfers)
    }
}

fn lock_error(err: impl ToString) -> TransferRepositoryError {
    TransferRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TransferRepository for InMemoryTransferRepository {
    async fn store(&self, transfer: &TaskTransfer) -> TransferRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.contains_key(&transfer.id()) {
            return Err(TransferRepositoryError::DuplicateTransfer(transfer.id()));
        }
        state.insert(transfer.id(), transfer.clone());
        Ok(())
    }

    async fn update_if_pending(&self, transfer: &TaskTransfer) -> TransferRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .get_mut(&transfer.id())
            .ok_or(TransferRepositoryError::NotFound(transfer.id()))?;
        if stored.status() != TransferStatus::Pending {
            return Err(TransferRepositoryError::NotPending(transfer.id()));
        }
        *stored = transfer.clone();
        Ok(())
    }

    async fn reopen(&self, pending: &TaskTransfer) -> TransferRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .get_mut(&pending.id())
            .ok_or(TransferRepositoryError::NotFound(pending.id()))?;
        *stored = pending.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: TransferId) -> TransferRepositoryResult<Option<TaskTransfer>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn list_by_task(&self, task_id: TaskId) -> TransferRepositoryResult<Vec<TaskTransfer>> {
        self.select(|transfer| transfer.task_id() == task_id)
    }

    async fn list_pending_for_recipient(
        &self,
        recipient: UserId,
    ) -> TransferRepositoryResult<Vec<TaskTransfer>> {
        self.select(|transfer| {
            transfer.to_user() == recipient && transfer.status() == TransferStatus::Pending
        })
    }
}
