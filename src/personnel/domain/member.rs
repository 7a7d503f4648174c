//! Team member as seen by the load projector.

use crate::access::{Role, UserId};
use crate::personnel::domain::PersonnelDomainError;
use serde::{Deserialize, Serialize};

/// An active user whose workload may be projected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    id: UserId,
    real_name: String,
    role: Role,
    daily_capacity_hours: Option<f64>,
}

impl Member {
    /// Creates a member without a personal capacity override.
    #[must_use]
    pub fn new(id: UserId, real_name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            real_name: real_name.into(),
            role,
            daily_capacity_hours: None,
        }
    }

    /// Returns the member's user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn real_name(&self) -> &str {
        &self.real_name
    }

    /// Returns the member's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the personal capacity override, if any.
    #[must_use]
    pub const fn daily_capacity_hours(&self) -> Option<f64> {
        self.daily_capacity_hours
    }

    /// Sets or clears the personal capacity override.
    ///
    /// # Errors
    ///
    /// Returns [`PersonnelDomainError::NonPositiveCapacity`] when `hours` is
    /// zero, negative or not finite.
    pub fn set_daily_capacity(&mut self, hours: Option<f64>) -> Result<(), PersonnelDomainError> {
        if let Some(value) = hours
            && !(value.is_finite() && value > 0.0)
        {
            return Err(PersonnelDomainError::NonPositiveCapacity(value));
        }
        self.daily_capacity_hours = hours;
        Ok(())
    }

    /// Returns the override when set, else `global_hours`.
    #[must_use]
    pub fn effective_capacity(&self, global_hours: f64) -> f64 {
        self.daily_capacity_hours
            .filter(|hours| *hours > 0.0)
            .unwrap_or(global_hours)
    }
}
