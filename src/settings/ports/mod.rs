//! Port abstractions for stored configuration.

mod repository;

pub use repository::{SettingsRepositoryError, SettingsRepositoryResult, SystemConfigRepository};
