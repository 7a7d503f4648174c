//! Member directory port.

use crate::access::UserId;
use crate::personnel::domain::Member;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory operations.
pub type PersonnelRepositoryResult<T> = Result<T, PersonnelRepositoryError>;

/// Errors returned by member directories.
#[derive(Debug, Clone, Error)]
pub enum PersonnelRepositoryError {
    /// The member does not exist.
    #[error("member not found: {0}")]
    MemberNotFound(UserId),

    /// Persistence failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PersonnelRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Source of active team members.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Inserts or replaces a member.
    async fn save(&self, member: &Member) -> PersonnelRepositoryResult<()>;

    /// Finds a member by user identifier.
    async fn find(&self, id: UserId) -> PersonnelRepositoryResult<Option<Member>>;

    /// Lists every active member ordered by name.
    async fn list_active(&self) -> PersonnelRepositoryResult<Vec<Member>>;
}
