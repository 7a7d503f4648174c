//! Error types for personnel validation.

use thiserror::Error;

/// Errors returned while validating personnel values.
#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum PersonnelDomainError {
    /// A personal capacity override must be a positive number of hours.
    #[error("daily capacity must be positive, got {0}")]
    NonPositiveCapacity(f64),
}
