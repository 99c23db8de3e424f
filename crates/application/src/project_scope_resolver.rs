use std::collections::HashSet;
use std::sync::Arc;

use autodeputy_core::AppResult;
use autodeputy_domain::{PersonId, ProjectId, ProjectScope};
use tracing::warn;

use crate::{DeputyPermissionRepository, ProjectRepository, ResolutionSettings};

/// Computes the project buckets a principal's deputies apply to.
#[derive(Clone)]
pub struct ProjectScopeResolver {
    project_repository: Arc<dyn ProjectRepository>,
    permission_repository: Arc<dyn DeputyPermissionRepository>,
    inherit_ancestor_scopes: bool,
}

impl ProjectScopeResolver {
    /// Creates a resolver over the host hierarchy and permission grants.
    #[must_use]
    pub fn new(
        project_repository: Arc<dyn ProjectRepository>,
        permission_repository: Arc<dyn DeputyPermissionRepository>,
        settings: &ResolutionSettings,
    ) -> Self {
        Self {
            project_repository,
            permission_repository,
            inherit_ancestor_scopes: settings.inherit_ancestor_scopes,
        }
    }

    /// Returns the target project followed by permitted ancestors, nearest first.
    ///
    /// An ancestor is included when its "permit deputies" flag is set and the
    /// person holds an explicit grant for it.
    pub async fn scope_for(
        &self,
        person_id: PersonId,
        project_id: ProjectId,
    ) -> AppResult<ProjectScope> {
        let mut scope = ProjectScope::new(project_id);
        if !self.inherit_ancestor_scopes {
            return Ok(scope);
        }

        let granted: HashSet<ProjectId> = self
            .permission_repository
            .list_permitted_projects(person_id)
            .await?
            .into_iter()
            .collect();
        if granted.is_empty() {
            return Ok(scope);
        }

        let mut visited = HashSet::from([project_id]);
        let mut next = self
            .project_repository
            .find_project(project_id)
            .await?
            .and_then(|project| project.parent_id());

        while let Some(ancestor_id) = next {
            if !visited.insert(ancestor_id) {
                warn!(
                    project_id = %project_id,
                    ancestor_id = %ancestor_id,
                    "project hierarchy contains a cycle"
                );
                break;
            }

            let Some(ancestor) = self.project_repository.find_project(ancestor_id).await? else {
                break;
            };
            if ancestor.permits_deputies() && granted.contains(&ancestor_id) {
                scope.push_ancestor(ancestor_id);
            }
            next = ancestor.parent_id();
        }

        Ok(scope)
    }
}
