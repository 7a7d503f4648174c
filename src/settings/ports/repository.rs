//! Key/value configuration store port.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for configuration store operations.
pub type SettingsRepositoryResult<T> = Result<T, SettingsRepositoryError>;

/// Errors returned by configuration stores.
#[derive(Debug, Clone, Error)]
pub enum SettingsRepositoryError {
    /// Persistence failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SettingsRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Key/value store for system configuration.
#[async_trait]
pub trait SystemConfigRepository: Send + Sync {
    /// Reads a raw value.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the lookup fails.
    async fn get(&self, key: &str) -> SettingsRepositoryResult<Option<String>>;

    /// Inserts or replaces a raw value.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the write fails.
    async fn set(&self, key: &str, value: &str) -> SettingsRepositoryResult<()>;
}
