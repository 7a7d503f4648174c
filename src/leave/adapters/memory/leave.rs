//! In-memory leave store, also serving as the calendar's leave source.

use crate::access::UserId;
use crate::calendar::{
    domain::DateRange,
    ports::{CalendarRepositoryError, CalendarRepositoryResult, LeaveCalendar},
};
use crate::leave::{
    domain::{Leave, LeaveId},
    ports::{LeaveRepository, LeaveRepositoryError, LeaveRepositoryResult},
};
use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory leave repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLeaveRepository {
    state: Arc<RwLock<HashMap<LeaveId, Leave>>>,
}

impl InMemoryLeaveRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> LeaveRepositoryError {
    LeaveRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl LeaveRepository for InMemoryLeaveRepository {
    async fn store(&self, leave: &Leave) -> LeaveRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.contains_key(&leave.id()) {
            return Err(LeaveRepositoryError::DuplicateLeave(leave.id()));
        }
        state.insert(leave.id(), leave.clone());
        Ok(())
    }

    async fn list_by_user(&self, user_id: UserId) -> LeaveRepositoryResult<Vec<Leave>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut leaves: Vec<Leave> = state
            .values()
            .filter(|leave| leave.user_id() == user_id)
            .cloned()
            .collect();
        leaves.sort_by_key(|leave| Reverse(leave.period().start()));
        Ok(leaves)
    }

    async fn find_by_id(&self, id: LeaveId) -> LeaveRepositoryResult<Option<Leave>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn delete_owned(&self, id: LeaveId, owner: UserId) -> LeaveRepositoryResult<bool> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.get(&id).is_some_and(|leave| leave.user_id() == owner) {
            state.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}

#[async_trait]
impl LeaveCalendar for InMemoryLeaveRepository {
    async fn leave_ranges(
        &self,
        user_id: UserId,
        window: DateRange,
    ) -> CalendarRepositoryResult<Vec<DateRange>> {
        let state = self.state.read().map_err(|err| {
            CalendarRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .values()
            .filter(|leave| leave.user_id() == user_id && leave.period().overlaps(&window))
            .map(Leave::period)
            .collect())
    }
}
