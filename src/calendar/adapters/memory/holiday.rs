//! In-memory holiday repository for tests and single-process daemons.

use crate::calendar::{
    domain::{DateRange, Holiday, HolidayId},
    ports::{CalendarRepositoryError, CalendarRepositoryResult, HolidayRepository},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory holiday repository keyed by date.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHolidayRepository {
    state: Arc<RwLock<BTreeMap<NaiveDate, Holiday>>>,
}

impl InMemoryHolidayRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> CalendarRepositoryError {
    CalendarRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl HolidayRepository for InMemoryHolidayRepository {
    async fn store(&self, holiday: &Holiday) -> CalendarRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.contains_key(&holiday.date()) {
            return Err(CalendarRepositoryError::DuplicateHoliday(holiday.date()));
        }
        state.insert(holiday.date(), holiday.clone());
        Ok(())
    }

    async fn delete(&self, id: HolidayId) -> CalendarRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let date = state
            .values()
            .find(|holiday| holiday.id() == id)
            .map(Holiday::date)
            .ok_or(CalendarRepositoryError::HolidayNotFound(id))?;
        state.remove(&date);
        Ok(())
    }

    async fn list_all(&self) -> CalendarRepositoryResult<Vec<Holiday>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.values().cloned().collect())
    }

    async fn dates_in_range(
        &self,
        range: DateRange,
    ) -> CalendarRepositoryResult<BTreeSet<NaiveDate>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .range(range.start()..=range.end())
            .map(|(date, _)| *date)
            .collect())
    }
}
