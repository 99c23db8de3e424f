use std::sync::Arc;

use autodeputy_core::AppResult;
use autodeputy_domain::{
    DeputyEntry, DeputyEntryId, DeputyRoster, DeputyScope, MoveDirection, PersonId, ProjectScope,
};

use crate::DeputyDirectoryRepository;

/// Ordered access to principals' deputy lists.
#[derive(Clone)]
pub struct DeputyDirectoryService {
    repository: Arc<dyn DeputyDirectoryRepository>,
}

impl DeputyDirectoryService {
    /// Creates a service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn DeputyDirectoryRepository>) -> Self {
        Self { repository }
    }

    /// Returns the full roster of a principal.
    pub async fn roster(&self, principal_id: PersonId) -> AppResult<DeputyRoster> {
        self.repository.load_roster(principal_id).await
    }

    /// Returns the entries usable within `scope`, in trial order.
    pub async fn entries_for(
        &self,
        principal_id: PersonId,
        scope: &ProjectScope,
    ) -> AppResult<Vec<DeputyEntry>> {
        let roster = self.repository.load_roster(principal_id).await?;
        Ok(roster.ordered_for(scope).into_iter().cloned().collect())
    }

    /// Appends a deputy at the end of the scope bucket.
    pub async fn append(
        &self,
        principal_id: PersonId,
        deputy_id: PersonId,
        scope: DeputyScope,
    ) -> AppResult<DeputyEntry> {
        self.repository
            .append_entry(principal_id, deputy_id, scope)
            .await
    }

    /// Moves an entry one step; boundary moves change nothing.
    pub async fn reorder(
        &self,
        principal_id: PersonId,
        entry_id: DeputyEntryId,
        direction: MoveDirection,
    ) -> AppResult<()> {
        self.repository
            .reorder_entry(principal_id, entry_id, direction)
            .await
    }

    /// Deletes an entry and closes the rank gap.
    pub async fn remove(
        &self,
        principal_id: PersonId,
        entry_id: DeputyEntryId,
    ) -> AppResult<DeputyEntry> {
        self.repository.remove_entry(principal_id, entry_id).await
    }
}
