//! In-memory template store.

use crate::periodic::{
    domain::{PeriodicTask, PeriodicTaskId},
    ports::{PeriodicRepositoryError, PeriodicRepositoryResult, PeriodicTaskRepository},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory template repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPeriodicTaskRepository {
    state: Arc<RwLock<HashMap<PeriodicTaskId, PeriodicTask>>>,
}

impl InMemoryPeriodicTaskRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn select(&self, active_only: bool) -> PeriodicRepositoryResult<Vec<PeriodicTask>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut templates: Vec<PeriodicTask> = state
            .values()
            .filter(|template| !active_only || template.is_active())
            .cloned()
            .collect();
        templates.sort_by_key(PeriodicTask::created_at);
        Ok(templates)
    }
}

fn lock_error(err: impl ToString) -> PeriodicRepositoryError {
    PeriodicRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl PeriodicTaskRepository for InMemoryPeriodicTaskRepository {
    async fn store(&self, template: &PeriodicTask) -> PeriodicRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.contains_key(&template.id()) {
            return Err(PeriodicRepositoryError::DuplicateTemplate(template.id()));
        }
        state.insert(template.id(), template.clone());
        Ok(())
    }

    async fn update(&self, template: &PeriodicTask) -> PeriodicRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .get_mut(&template.id())
            .ok_or(PeriodicRepositoryError::NotFound(template.id()))?;
        *stored = template.clone();
        Ok(())
    }

    async fn delete(&self, id: PeriodicTaskId) -> PeriodicRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .remove(&id)
            .map(|_| ())
            .ok_or(PeriodicRepositoryError::NotFound(id))
    }

    async fn find_by_id(
        &self,
        id: PeriodicTaskId,
    ) -> PeriodicRepositoryResult<Option<PeriodicTask>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn list_all(&self) -> PeriodicRepositoryResult<Vec<PeriodicTask>> {
        self.select(false)
    }

    async fn list_active(&self) -> PeriodicRepositoryResult<Vec<PeriodicTask>> {
        self.select(true)
    }
}
