//! Template repository port.

use crate::periodic::domain::{PeriodicTask, PeriodicTaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for template repository operations.
pub type PeriodicRepositoryResult<T> = Result<T, PeriodicRepositoryError>;

/// Errors returned by template repositories.
#[derive(Debug, Clone, Error)]
pub enum PeriodicRepositoryError {
    /// A template with the same identifier already exists.
    #[error("duplicate periodic task identifier: {0}")]
    DuplicateTemplate(PeriodicTaskId),

    /// The template was not found.
    #[error("periodic task not found: {0}")]
    NotFound(PeriodicTaskId),

    /// Persistence failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PeriodicRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Template persistence contract.
#[async_trait]
pub trait PeriodicTaskRepository: Send + Sync {
    /// Stores a new template.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodicRepositoryError::DuplicateTemplate`] when the
    /// identifier already exists.
    async fn store(&self, template: &PeriodicTask) -> PeriodicRepositoryResult<()>;

    /// Replaces an existing template.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodicRepositoryError::NotFound`] when absent.
    async fn update(&self, template: &PeriodicTask) -> PeriodicRepositoryResult<()>;

    /// Removes a template.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodicRepositoryError::NotFound`] when absent.
    async fn delete(&self, id: PeriodicTaskId) -> PeriodicRepositoryResult<()>;

    /// Finds a template by identifier.
    async fn find_by_id(&self, id: PeriodicTaskId)
    -> PeriodicRepositoryResult<Option<PeriodicTask>>;

    /// Lists every template, oldest first.
    async fn list_all(&self) -> PeriodicRepositoryResult<Vec<PeriodicTask>>;

    /// Lists templates whose trigger should be live.
    async fn list_active(&self) -> PeriodicRepositoryResult<Vec<PeriodicTask>>;
}
