//! Holiday repository port.

use crate::calendar::domain::{DateRange, Holiday, HolidayId};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Result type for calendar repository operations.
pub type CalendarRepositoryResult<T> = Result<T, CalendarRepositoryError>;

/// Errors returned by calendar repositories.
#[derive(Debug, Clone, Error)]
pub enum CalendarRepositoryError {
    /// A holiday is already configured for the date.
    #[error("holiday already configured for {0}")]
    DuplicateHoliday(NaiveDate),

    /// The holiday does not exist.
    #[error("holiday not found: {0}")]
    HolidayNotFound(HolidayId),

    /// Persistence failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CalendarRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Storage for globally configured holidays.
#[async_trait]
pub trait HolidayRepository: Send + Sync {
    /// Stores a new holiday.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarRepositoryError::DuplicateHoliday`] when the date is
    /// already configured.
    async fn store(&self, holiday: &Holiday) -> CalendarRepositoryResult<()>;

    /// Removes a holiday.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarRepositoryError::HolidayNotFound`] when the holiday
    /// does not exist.
    async fn delete(&self, id: HolidayId) -> CalendarRepositoryResult<()>;

    /// Lists every holiday ordered by date.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the query fails.
    async fn list_all(&self) -> CalendarRepositoryResult<Vec<Holiday>>;

    /// Returns the holiday dates that fall inside `range`.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the query fails.
    async fn dates_in_range(&self, range: DateRange)
    -> CalendarRepositoryResult<BTreeSet<NaiveDate>>;
}
