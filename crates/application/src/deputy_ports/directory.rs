use async_trait::async_trait;
use autodeputy_core::AppResult;
use autodeputy_domain::{
    DeputyEntry, DeputyEntryId, DeputyRoster, DeputyScope, MoveDirection, PersonId,
};

/// Repository port for principals' deputy lists.
///
/// Implementations must serialize mutations per principal so that ranks in
/// every scope bucket stay a permutation of `0..n`. The rank arithmetic lives
/// in [`DeputyRoster`]; adapters load the roster, apply the mutation and
/// persist the returned rank updates atomically.
#[async_trait]
pub trait DeputyDirectoryRepository: Send + Sync {
    /// Loads every entry of a principal.
    async fn load_roster(&self, principal_id: PersonId) -> AppResult<DeputyRoster>;

    /// Appends a deputy at the next free rank of the scope bucket.
    async fn append_entry(
        &self,
        principal_id: PersonId,
        deputy_id: PersonId,
        scope: DeputyScope,
    ) -> AppResult<DeputyEntry>;

    /// Moves an entry one rank up or down inside its bucket.
    async fn reorder_entry(
        &self,
        principal_id: PersonId,
        entry_id: DeputyEntryId,
        direction: MoveDirection,
    ) -> AppResult<()>;

    /// Deletes an entry and compacts the ranks of its bucket.
    async fn remove_entry(
        &self,
        principal_id: PersonId,
        entry_id: DeputyEntryId,
    ) -> AppResult<DeputyEntry>;
}
