//! Reading and updating system configuration.

use crate::access::{AccessDenied, Actor, Operation, policy};
use crate::error::ErrorKind;
use crate::settings::{
    domain::{
        DEFAULT_DAILY_WORK_HOURS, GLOBAL_DAILY_WORK_HOURS, SettingsDomainError, parse_daily_hours,
    },
    ports::{SettingsRepositoryError, SystemConfigRepository},
};
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for configuration access.
#[derive(Debug, Error)]
pub enum SettingsServiceError {
    /// Value failed validation.
    #[error(transparent)]
    Domain(#[from] SettingsDomainError),
    /// Caller may not change configuration.
    #[error(transparent)]
    Access(#[from] AccessDenied),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] SettingsRepositoryError),
}

impl SettingsServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::Access(_) => ErrorKind::PermissionDenied,
            Self::Repository(_) => ErrorKind::Infrastructure,
        }
    }
}

/// Result type for configuration service operations.
pub type SettingsServiceResult<T> = Result<T, SettingsServiceError>;

/// Typed access to stored configuration.
#[derive(Clone)]
pub struct SystemSettingsService<R>
where
    R: SystemConfigRepository,
{
    repository: Arc<R>,
}

impl<R> SystemSettingsService<R>
where
    R: SystemConfigRepository,
{
    /// Creates a new settings service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns the default daily capacity in hours.
    ///
    /// An absent value yields the default. A stored value that does not
    /// parse as a positive number also yields the default, with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsServiceError::Repository`] when the store fails.
    pub async fn daily_work_hours(&self) -> SettingsServiceResult<f64> {
        let Some(raw) = self.repository.get(GLOBAL_DAILY_WORK_HOURS).await? else {
            return Ok(DEFAULT_DAILY_WORK_HOURS);
        };
        match parse_daily_hours(&raw) {
            Ok(hours) => Ok(hours),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    fallback = DEFAULT_DAILY_WORK_HOURS,
                    "stored daily capacity is unusable"
                );
                Ok(DEFAULT_DAILY_WORK_HOURS)
            }
        }
    }

    /// Reads a raw configuration value.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsServiceError::Repository`] when the store fails.
    pub async fn get(&self, key: &str) -> SettingsServiceResult<Option<String>> {
        Ok(self.repository.get(key).await?)
    }

    /// Stores a configuration value.
    ///
    /// The daily capacity key must be a positive number; other keys are
    /// stored verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsServiceError::Access`] for non-administrators and
    /// [`SettingsServiceError::Domain`] for an invalid capacity value.
    pub async fn update(&self, actor: &Actor, key: &str, value: &str) -> SettingsServiceResult<()> {
        policy::administrator(actor, Operation::ManageSettings)?;
        let stored = if key == GLOBAL_DAILY_WORK_HOURS {
            parse_daily_hours(value)?;
            value.trim()
        } else {
            value
        };
        self.repository.set(key, stored).await?;
        tracing::info!(key, "system configuration updated");
        Ok(())
    }
}
