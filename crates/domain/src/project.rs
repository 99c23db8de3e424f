//! Host projects and the ordered scope used to pick deputy buckets.

use autodeputy_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::ProjectId;

/// Host project as reported by the project collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: NonEmptyString,
    parent_id: Option<ProjectId>,
    permits_deputies: bool,
}

impl Project {
    /// Creates a project definition.
    pub fn new(
        id: ProjectId,
        name: impl Into<String>,
        parent_id: Option<ProjectId>,
        permits_deputies: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            parent_id,
            permits_deputies,
        })
    }

    /// Returns the project identifier.
    #[must_use]
    pub fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the parent project, if any.
    #[must_use]
    pub fn parent_id(&self) -> Option<ProjectId> {
        self.parent_id
    }

    /// Returns whether the project-level "permit deputies" flag is set.
    #[must_use]
    pub fn permits_deputies(&self) -> bool {
        self.permits_deputies
    }
}

/// Ordered set of project identifiers, most specific first.
///
/// The target project is always the first member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectScope {
    projects: Vec<ProjectId>,
}

impl ProjectScope {
    /// Creates a scope containing only the target project.
    #[must_use]
    pub fn new(target: ProjectId) -> Self {
        Self {
            projects: vec![target],
        }
    }

    /// Appends a less specific project. Already present ids are ignored.
    pub fn push_ancestor(&mut self, project_id: ProjectId) {
        if !self.contains(project_id) {
            self.projects.push(project_id);
        }
    }

    /// Returns the target project.
    #[must_use]
    pub fn target(&self) -> ProjectId {
        self.projects[0]
    }

    /// Returns whether the project is part of the scope.
    #[must_use]
    pub fn contains(&self, project_id: ProjectId) -> bool {
        self.projects.contains(&project_id)
    }

    /// Returns the specificity rank of a project (0 is the target).
    #[must_use]
    pub fn position(&self, project_id: ProjectId) -> Option<usize> {
        self.projects.iter().position(|value| *value == project_id)
    }

    /// Returns the members in specificity order.
    #[must_use]
    pub fn as_slice(&self) -> &[ProjectId] {
        self.projects.as_slice()
    }
}
