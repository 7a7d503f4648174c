//! Configuration services.

mod system;

pub use system::{SettingsServiceError, SettingsServiceResult, SystemSettingsService};
