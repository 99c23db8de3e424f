//! Maintenance operations behind the deputy list management surface.
//!
//! Covers listing and editing a person's deputies, replacing their
//! unavailability windows and their deputy permission grants.

use std::collections::HashSet;
use std::sync::Arc;

use autodeputy_core::{AppError, AppResult};
use autodeputy_domain::{
    DeputyEntry, DeputyEntryId, DeputyScope, MoveDirection, Person, PersonId, Project, ProjectId,
    UnavailabilityWindow, ensure_non_overlapping,
};
use tracing::{info, warn};

use crate::{
    AvailabilityRepository, DeputyDirectoryService, DeputyPermissionRepository, PersonRepository,
    ProjectRepository,
};

/// Deputy entry joined with the deputy's person record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeputyListing {
    /// Stored entry.
    pub entry: DeputyEntry,
    /// Referenced deputy; `None` when the person no longer exists.
    pub deputy: Option<Person>,
}

/// Project eligible for deputy inheritance, with the person's grant state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeputyProjectOption {
    /// Project with the "permit deputies" flag set.
    pub project: Project,
    /// Whether the person holds a grant for the project.
    pub granted: bool,
}

/// Application service for deputy list maintenance.
#[derive(Clone)]
pub struct DeputyManagementService {
    directory: DeputyDirectoryService,
    availability_repository: Arc<dyn AvailabilityRepository>,
    permission_repository: Arc<dyn DeputyPermissionRepository>,
    person_repository: Arc<dyn PersonRepository>,
    project_repository: Arc<dyn ProjectRepository>,
}

impl DeputyManagementService {
    /// Creates a new management service.
    #[must_use]
    pub fn new(
        directory: DeputyDirectoryService,
        availability_repository: Arc<dyn AvailabilityRepository>,
        permission_repository: Arc<dyn DeputyPermissionRepository>,
        person_repository: Arc<dyn PersonRepository>,
        project_repository: Arc<dyn ProjectRepository>,
    ) -> Self {
        Self {
            directory,
            availability_repository,
            permission_repository,
            person_repository,
            project_repository,
        }
    }

    /// Lists a principal's deputies grouped by scope, then by rank.
    ///
    /// Entries whose deputy was removed by the host stay listed so they can
    /// still be deleted.
    pub async fn list_deputies(&self, principal_id: PersonId) -> AppResult<Vec<DeputyListing>> {
        let roster = self.directory.roster(principal_id).await?;

        let mut listings = Vec::new();
        for entry in roster.entries() {
            let deputy = self.person_repository.find_person(entry.deputy_id()).await?;
            if deputy.is_none() {
                warn!(
                    principal_id = %principal_id,
                    entry_id = %entry.id(),
                    deputy_id = %entry.deputy_id(),
                    "deputy entry references a missing person"
                );
            }
            listings.push(DeputyListing {
                entry: entry.clone(),
                deputy,
            });
        }

        Ok(listings)
    }

    /// Registers a deputy at the end of the scope bucket.
    pub async fn create_deputy(
        &self,
        principal_id: PersonId,
        deputy_id: PersonId,
        scope: DeputyScope,
    ) -> AppResult<DeputyEntry> {
        self.require_person(principal_id).await?;
        self.require_person(deputy_id).await?;
        if let Some(project_id) = scope.project_id() {
            self.require_project(project_id).await?;
        }

        let entry = self.directory.append(principal_id, deputy_id, scope).await?;
        info!(
            principal_id = %principal_id,
            deputy_id = %deputy_id,
            entry_id = %entry.id(),
            rank = entry.rank(),
            "deputy entry created"
        );

        Ok(entry)
    }

    /// Moves an entry one rank towards the front of its bucket.
    pub async fn move_up(&self, principal_id: PersonId, entry_id: DeputyEntryId) -> AppResult<()> {
        self.move_entry(principal_id, entry_id, MoveDirection::Up)
            .await
    }

    /// Moves an entry one rank towards the back of its bucket.
    pub async fn move_down(
        &self,
        principal_id: PersonId,
        entry_id: DeputyEntryId,
    ) -> AppResult<()> {
        self.move_entry(principal_id, entry_id, MoveDirection::Down)
            .await
    }

    /// Deletes an entry; later entries of the bucket move up one rank.
    pub async fn delete_deputy(
        &self,
        principal_id: PersonId,
        entry_id: DeputyEntryId,
    ) -> AppResult<DeputyEntry> {
        let removed = self.directory.remove(principal_id, entry_id).await?;
        info!(
            principal_id = %principal_id,
            entry_id = %entry_id,
            "deputy entry deleted"
        );

        Ok(removed)
    }

    /// Returns a person's unavailability windows, earliest first.
    pub async fn availability_for(
        &self,
        person_id: PersonId,
    ) -> AppResult<Vec<UnavailabilityWindow>> {
        let mut windows = self.availability_repository.list_windows(person_id).await?;
        windows.sort_by_key(|window| (window.from(), window.to()));
        Ok(windows)
    }

    /// Replaces a person's unavailability windows.
    pub async fn set_availabilities(
        &self,
        person_id: PersonId,
        windows: Vec<UnavailabilityWindow>,
    ) -> AppResult<()> {
        self.require_person(person_id).await?;
        ensure_non_overlapping(&windows)?;

        let window_count = windows.len();
        self.availability_repository
            .replace_windows(person_id, windows)
            .await?;
        info!(
            person_id = %person_id,
            window_count,
            "unavailability windows replaced"
        );

        Ok(())
    }

    /// Replaces a person's deputy permission grants.
    pub async fn set_permissions(
        &self,
        person_id: PersonId,
        project_ids: Vec<ProjectId>,
    ) -> AppResult<()> {
        self.require_person(person_id).await?;

        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(project_ids.len());
        for project_id in project_ids {
            if !seen.insert(project_id) {
                continue;
            }
            let project = self.require_project(project_id).await?;
            if !project.permits_deputies() {
                return Err(AppError::Validation(format!(
                    "project '{}' does not permit deputies",
                    project.name()
                )));
            }
            unique.push(project_id);
        }

        let grant_count = unique.len();
        self.permission_repository
            .replace_permitted_projects(person_id, unique)
            .await?;
        info!(
            person_id = %person_id,
            grant_count,
            "deputy permissions replaced"
        );

        Ok(())
    }

    /// Lists projects permitting deputies, flagged with the person's grants.
    pub async fn projects_for_user(
        &self,
        person_id: PersonId,
    ) -> AppResult<Vec<DeputyProjectOption>> {
        let granted: HashSet<ProjectId> = self
            .permission_repository
            .list_permitted_projects(person_id)
            .await?
            .into_iter()
            .collect();

        let mut options: Vec<DeputyProjectOption> = self
            .project_repository
            .list_projects()
            .await?
            .into_iter()
            .filter(Project::permits_deputies)
            .map(|project| DeputyProjectOption {
                granted: granted.contains(&project.id()),
                project,
            })
            .collect();
        options.sort_by(|left, right| left.project.name().cmp(right.project.name()));

        Ok(options)
    }

    async fn move_entry(
        &self,
        principal_id: PersonId,
        entry_id: DeputyEntryId,
        direction: MoveDirection,
    ) -> AppResult<()> {
        self.directory
            .reorder(principal_id, entry_id, direction)
            .await?;
        info!(
            principal_id = %principal_id,
            entry_id = %entry_id,
            direction = direction.as_str(),
            "deputy entry moved"
        );

        Ok(())
    }

    async fn require_person(&self, person_id: PersonId) -> AppResult<Person> {
        self.person_repository
            .find_person(person_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("person '{person_id}' does not exist")))
    }

    async fn require_project(&self, project_id: ProjectId) -> AppResult<Project> {
        self.project_repository
            .find_project(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("project '{project_id}' does not exist")))
    }
}
