use async_trait::async_trait;
use autodeputy_core::AppResult;
use autodeputy_domain::{Person, PersonId};

/// Read port for host person records.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Finds a person by identifier.
    async fn find_person(&self, person_id: PersonId) -> AppResult<Option<Person>>;
}
