//! In-memory member directory.

use crate::access::UserId;
use crate::personnel::{
    domain::Member,
    ports::{MemberDirectory, PersonnelRepositoryError, PersonnelRepositoryResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory member directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMemberDirectory {
    state: Arc<RwLock<HashMap<UserId, Member>>>,
}

impl InMemoryMemberDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> PersonnelRepositoryError {
    PersonnelRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl MemberDirectory for InMemoryMemberDirectory {
    async fn save(&self, member: &Member) -> PersonnelRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.insert(member.id(), member.clone());
        Ok(())
    }

    async fn find(&self, id: UserId) -> PersonnelRepositoryResult<Option<Member>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn list_active(&self) -> PersonnelRepositoryResult<Vec<Member>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut members: Vec<Member> = state.values().cloned().collect();
        members.sort_by(|a, b| a.real_name().cmp(b.real_name()));
        Ok(members)
    }
}
