use std::sync::Arc;

use autodeputy_core::{AppError, AppResult};
use autodeputy_domain::{Person, PersonId, ProjectScope};
use chrono::NaiveDate;
use tracing::debug;

use crate::{AvailabilityService, DeputyDirectoryService, PersonRepository};

/// First-fit search over a principal's deputy list.
///
/// Resolution is one hop deep: a deputy's own deputies are never consulted.
#[derive(Clone)]
pub struct DeputyResolver {
    directory: DeputyDirectoryService,
    availability: AvailabilityService,
    person_repository: Arc<dyn PersonRepository>,
}

impl DeputyResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new(
        directory: DeputyDirectoryService,
        availability: AvailabilityService,
        person_repository: Arc<dyn PersonRepository>,
    ) -> Self {
        Self {
            directory,
            availability,
            person_repository,
        }
    }

    /// Returns the first deputy in trial order who is available on `date`.
    pub async fn find_deputy(
        &self,
        principal_id: PersonId,
        scope: &ProjectScope,
        date: NaiveDate,
    ) -> AppResult<Option<Person>> {
        for entry in self.directory.entries_for(principal_id, scope).await? {
            if !self.availability.is_available(entry.deputy_id(), date).await? {
                debug!(
                    principal_id = %principal_id,
                    deputy_id = %entry.deputy_id(),
                    rank = entry.rank(),
                    "deputy unavailable, trying next"
                );
                continue;
            }

            let deputy = self
                .person_repository
                .find_person(entry.deputy_id())
                .await?
                .ok_or_else(|| {
                    AppError::Internal(format!(
                        "deputy entry '{}' references unknown person '{}'",
                        entry.id(),
                        entry.deputy_id()
                    ))
                })?;

            return Ok(Some(deputy));
        }

        Ok(None)
    }
}
