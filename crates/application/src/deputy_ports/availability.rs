use async_trait::async_trait;
use autodeputy_core::AppResult;
use autodeputy_domain::{PersonId, UnavailabilityWindow};

/// Repository port for per-person unavailability windows.
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Lists the windows of a person. Unknown persons have none.
    async fn list_windows(&self, person_id: PersonId) -> AppResult<Vec<UnavailabilityWindow>>;

    /// Replaces every window of a person.
    async fn replace_windows(
        &self,
        person_id: PersonId,
        windows: Vec<UnavailabilityWindow>,
    ) -> AppResult<()>;
}
