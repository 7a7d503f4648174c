//! Hash-map backed configuration store.

use crate::settings::ports::{
    SettingsRepositoryError, SettingsRepositoryResult, SystemConfigRepository,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory configuration store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySystemConfigRepository {
    state: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySystemConfigRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> SettingsRepositoryError {
    SettingsRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl SystemConfigRepository for InMemorySystemConfigRepository {
    async fn get(&self, key: &str) -> SettingsRepositoryResult<Option<String>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> SettingsRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
