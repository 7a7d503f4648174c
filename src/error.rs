//! Caller-visible error categories.
//!
//! Every service error enum in the crate maps onto one of these categories
//! through a `kind()` method, so transport layers can choose a response
//! without matching on every variant.

use std::fmt;

/// Category of a service failure as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The referenced entity does not exist.
    NotFound,
    /// The caller's role or identity does not satisfy the operation.
    PermissionDenied,
    /// The entity is not in the status the transition requires.
    StateConflict,
    /// The supplied input is malformed.
    Validation,
    /// An unexpected store or runtime failure.
    Infrastructure,
}

impl ErrorKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::PermissionDenied => "permission_denied",
            Self::StateConflict => "state_conflict",
            Self::Validation => "validation",
            Self::Infrastructure => "infrastructure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
