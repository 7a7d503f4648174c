//! Administrative holiday management.

use crate::access::{AccessDenied, Actor, Operation, policy};
use crate::calendar::{
    domain::{Holiday, HolidayId},
    ports::{CalendarRepositoryError, HolidayRepository},
};
use crate::error::ErrorKind;
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for holiday management.
#[derive(Debug, Error)]
pub enum HolidayServiceError {
    /// Caller may not manage holidays.
    #[error(transparent)]
    Access(#[from] AccessDenied),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] CalendarRepositoryError),
}

impl HolidayServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Access(_) => ErrorKind::PermissionDenied,
            Self::Repository(CalendarRepositoryError::DuplicateHoliday(_)) => {
                ErrorKind::StateConflict
            }
            Self::Repository(CalendarRepositoryError::HolidayNotFound(_)) => ErrorKind::NotFound,
            Self::Repository(CalendarRepositoryError::Persistence(_)) => {
                ErrorKind::Infrastructure
            }
        }
    }
}

/// Result type for holiday service operations.
pub type HolidayServiceResult<T> = Result<T, HolidayServiceError>;

/// Creates, lists and removes holidays.
#[derive(Clone)]
pub struct HolidayService<H, C>
where
    H: HolidayRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<H>,
    clock: Arc<C>,
}

impl<H, C> HolidayService<H, C>
where
    H: HolidayRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new holiday service.
    #[must_use]
    pub const fn new(repository: Arc<H>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Lists every configured holiday ordered by date.
    ///
    /// # Errors
    ///
    /// Returns [`HolidayServiceError::Repository`] when the query fails.
    pub async fn list(&self) -> HolidayServiceResult<Vec<Holiday>> {
        Ok(self.repository.list_all().await?)
    }

    /// Adds a holiday.
    ///
    /// # Errors
    ///
    /// Returns [`HolidayServiceError::Access`] for non-administrators and a
    /// repository error when the date is already a holiday.
    pub async fn create(
        &self,
        actor: &Actor,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> HolidayServiceResult<Holiday> {
        policy::administrator(actor, Operation::ManageHolidays)?;
        let holiday = Holiday::new(date, description, &*self.clock);
        self.repository.store(&holiday).await?;
        tracing::info!(holiday_id = %holiday.id(), %date, "holiday added");
        Ok(holiday)
    }

    /// Removes a holiday.
    ///
    /// # Errors
    ///
    /// Returns [`HolidayServiceError::Access`] for non-administrators and a
    /// repository error when the holiday does not exist.
    pub async fn delete(&self, actor: &Actor, id: HolidayId) -> HolidayServiceResult<()> {
        policy::administrator(actor, Operation::ManageHolidays)?;
        self.repository.delete(id).await?;
        tracing::info!(holiday_id = %id, "holiday removed");
        Ok(())
    }
}
