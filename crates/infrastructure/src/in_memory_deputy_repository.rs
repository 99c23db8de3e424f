use std::collections::HashMap;

use async_trait::async_trait;
use autodeputy_application::{
    AvailabilityRepository, DeputyDirectoryRepository, DeputyPermissionRepository,
    PersonRepository, ProjectRepository,
};
use autodeputy_core::AppResult;
use autodeputy_domain::{
    DeputyEntry, DeputyEntryId, DeputyRoster, DeputyScope, MoveDirection, Person, PersonId,
    Project, ProjectId, UnavailabilityWindow,
};
use tokio::sync::RwLock;

/// In-memory implementation of every deputy port.
///
/// Hosts seed persons and projects through [`InMemoryDeputyRepository::insert_person`]
/// and [`InMemoryDeputyRepository::insert_project`]. Directory mutations hold
/// the directory write lock for their whole read-modify-write cycle.
#[derive(Debug, Default)]
pub struct InMemoryDeputyRepository {
    people: RwLock<HashMap<PersonId, Person>>,
    projects: RwLock<HashMap<ProjectId, Project>>,
    windows: RwLock<HashMap<PersonId, Vec<UnavailabilityWindow>>>,
    entries: RwLock<HashMap<PersonId, Vec<DeputyEntry>>>,
    permissions: RwLock<HashMap<PersonId, Vec<ProjectId>>>,
}

impl InMemoryDeputyRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a person record.
    pub async fn insert_person(&self, person: Person) {
        self.people.write().await.insert(person.id(), person);
    }

    /// Adds or replaces a project record.
    pub async fn insert_project(&self, project: Project) {
        self.projects.write().await.insert(project.id(), project);
    }

    async fn mutate_roster<T>(
        &self,
        principal_id: PersonId,
        mutation: impl FnOnce(&mut DeputyRoster) -> AppResult<T> + Send,
    ) -> AppResult<T> {
        let mut entries = self.entries.write().await;
        let stored = entries.get(&principal_id).cloned().unwrap_or_default();
        let mut roster = DeputyRoster::new(principal_id, stored)?;

        let result = mutation(&mut roster)?;
        entries.insert(principal_id, roster.into_entries());

        Ok(result)
    }
}

#[async_trait]
impl PersonRepository for InMemoryDeputyRepository {
    async fn find_person(&self, person_id: PersonId) -> AppResult<Option<Person>> {
        Ok(self.people.read().await.get(&person_id).cloned())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryDeputyRepository {
    async fn find_project(&self, project_id: ProjectId) -> AppResult<Option<Project>> {
        Ok(self.projects.read().await.get(&project_id).cloned())
    }

    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        let mut projects: Vec<Project> = self.projects.read().await.values().cloned().collect();
        projects.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(projects)
    }
}

#[async_trait]
impl AvailabilityRepository for InMemoryDeputyRepository {
    async fn list_windows(&self, person_id: PersonId) -> AppResult<Vec<UnavailabilityWindow>> {
        Ok(self
            .windows
            .read()
            .await
            .get(&person_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_windows(
        &self,
        person_id: PersonId,
        windows: Vec<UnavailabilityWindow>,
    ) -> AppResult<()> {
        self.windows.write().await.insert(person_id, windows);
        Ok(())
    }
}

#[async_trait]
impl DeputyDirectoryRepository for InMemoryDeputyRepository {
    async fn load_roster(&self, principal_id: PersonId) -> AppResult<DeputyRoster> {
        let stored = self
            .entries
            .read()
            .await
            .get(&principal_id)
            .cloned()
            .unwrap_or_default();
        DeputyRoster::new(principal_id, stored)
    }

    async fn append_entry(
        &self,
        principal_id: PersonId,
        deputy_id: PersonId,
        scope: DeputyScope,
    ) -> AppResult<DeputyEntry> {
        self.mutate_roster(principal_id, |roster| roster.append(deputy_id, scope))
            .await
    }

    async fn reorder_entry(
        &self,
        principal_id: PersonId,
        entry_id: DeputyEntryId,
        direction: MoveDirection,
    ) -> AppResult<()> {
        self.mutate_roster(principal_id, |roster| {
            roster.reorder(entry_id, direction).map(|_| ())
        })
        .await
    }

    async fn remove_entry(
        &self,
        principal_id: PersonId,
        entry_id: DeputyEntryId,
    ) -> AppResult<DeputyEntry> {
        self.mutate_roster(principal_id, |roster| {
            roster.remove(entry_id).map(|removal| removal.removed)
        })
        .await
    }
}

#[async_trait]
impl DeputyPermissionRepository for InMemoryDeputyRepository {
    async fn list_permitted_projects(&self, person_id: PersonId) -> AppResult<Vec<ProjectId>> {
        Ok(self
            .permissions
            .read()
            .await
            .get(&person_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_permitted_projects(
        &self,
        person_id: PersonId,
        project_ids: Vec<ProjectId>,
    ) -> AppResult<()> {
        self.permissions.write().await.insert(person_id, project_ids);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
