//! In-memory task repository.
//!
//! Every mutation takes the write lock for its whole read-check-write, which
//! is what makes [`TaskRepository::update_if`] atomic here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::access::UserId;
use crate::task::{
    domain::{Task, TaskId, TaskStatus},
    ports::{TaskFilter, TaskGuard, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn count(iter: impl Iterator) -> u64 {
    iter.fold(0_u64, |total, _| total.saturating_add(1))
}

fn subtasks_of(state: &HashMap<TaskId, Task>, parent: TaskId) -> impl Iterator<Item = &Task> {
    state
        .values()
        .filter(move |task| task.parent_id() == Some(parent))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update_if(&self, task: &Task, guard: TaskGuard) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .get(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        if !guard.matches(stored) {
            return Err(TaskRepositoryError::Conflict {
                task_id: task.id(),
                expected: guard.status,
            });
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn list(&self, filter: TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut tasks: Vec<Task> = state
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(tasks)
    }

    async fn find_subtasks(&self, parent: TaskId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut tasks: Vec<Task> = subtasks_of(&state, parent).cloned().collect();
        tasks.sort_by_key(Task::created_at);
        Ok(tasks)
    }

    async fn subtask_effort_total(&self, parent: TaskId) -> TaskRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(subtasks_of(&state, parent)
            .map(|task| u64::from(task.effort()))
            .fold(0_u64, u64::saturating_add))
    }

    async fn count_incomplete_subtasks(&self, parent: TaskId) -> TaskRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(count(
            subtasks_of(&state, parent).filter(|task| task.status() != TaskStatus::Completed),
        ))
    }

    async fn reassign_subtasks(
        &self,
        parent: TaskId,
        from: UserId,
        to: UserId,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<u64> {
        let mut state = self.state.write().map_err(lock_error)?;
        let mut moved = 0_u64;
        for task in state.values_mut() {
            if task.parent_id() == Some(parent) && task.assignee_id() == Some(from) {
                task.reassign(to, at);
                moved = moved.saturating_add(1);
            }
        }
        Ok(moved)
    }

    async fn count_by_status(&self, status: TaskStatus) -> TaskRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(count(state.values().filter(|task| task.status() == status)))
    }
}
