use async_trait::async_trait;
use autodeputy_core::AppResult;
use autodeputy_domain::{PersonId, Project, ProjectId};

/// Read port for the host project hierarchy.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Finds a project by identifier.
    async fn find_project(&self, project_id: ProjectId) -> AppResult<Option<Project>>;

    /// Lists every project known to the host.
    async fn list_projects(&self) -> AppResult<Vec<Project>>;
}

/// Repository port for explicit per-person deputy permission grants.
#[async_trait]
pub trait DeputyPermissionRepository: Send + Sync {
    /// Lists projects in which the person's deputy assignments may be inherited.
    async fn list_permitted_projects(&self, person_id: PersonId) -> AppResult<Vec<ProjectId>>;

    /// Replaces the person's grants.
    async fn replace_permitted_projects(
        &self,
        person_id: PersonId,
        project_ids: Vec<ProjectId>,
    ) -> AppResult<()>;
}
