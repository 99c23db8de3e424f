use std::sync::Arc;

use autodeputy_core::AppResult;
use autodeputy_domain::{AvailabilityCalendar, PersonId};
use chrono::NaiveDate;

use crate::AvailabilityRepository;

/// Answers point-in-time availability queries from stored windows.
#[derive(Clone)]
pub struct AvailabilityService {
    repository: Arc<dyn AvailabilityRepository>,
}

impl AvailabilityService {
    /// Creates a service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AvailabilityRepository>) -> Self {
        Self { repository }
    }

    /// Loads the calendar of a person.
    pub async fn calendar_for(&self, person_id: PersonId) -> AppResult<AvailabilityCalendar> {
        let windows = self.repository.list_windows(person_id).await?;
        Ok(AvailabilityCalendar::new(windows))
    }

    /// Returns whether no window of the person contains the date.
    pub async fn is_available(&self, person_id: PersonId, date: NaiveDate) -> AppResult<bool> {
        Ok(self.calendar_for(person_id).await?.is_available(date))
    }
}
