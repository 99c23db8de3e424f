//! Deputy entries and the rank arithmetic of a principal's deputy list.
//!
//! Entries are grouped into scope buckets: one bucket for "all projects" and
//! one per project. Within a bucket ranks are always `0..n`. Every mutation
//! returns the rank changes it made so storage adapters can persist them in
//! the same transaction as the insert or delete.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use autodeputy_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{DeputyEntryId, PersonId, ProjectId, ProjectScope};

/// Project scope a deputy entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "project_id", rename_all = "snake_case")]
pub enum DeputyScope {
    /// Entry applies to every project.
    AllProjects,
    /// Entry applies to one project.
    Project(ProjectId),
}

impl DeputyScope {
    /// Builds a scope from a nullable project column.
    #[must_use]
    pub fn from_project(project_id: Option<ProjectId>) -> Self {
        project_id.map_or(Self::AllProjects, Self::Project)
    }

    /// Returns the scoped project, if any.
    #[must_use]
    pub fn project_id(&self) -> Option<ProjectId> {
        match self {
            Self::AllProjects => None,
            Self::Project(project_id) => Some(*project_id),
        }
    }

    /// Returns whether entries of this scope may be used inside `scope`.
    #[must_use]
    pub fn applies_to(&self, scope: &ProjectScope) -> bool {
        match self {
            Self::AllProjects => true,
            Self::Project(project_id) => scope.contains(*project_id),
        }
    }
}

/// Direction of a one-step rank move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    /// Towards rank 0, tried earlier.
    Up,
    /// Away from rank 0, tried later.
    Down,
}

impl MoveDirection {
    /// Returns the transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl FromStr for MoveDirection {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(AppError::Validation(format!(
                "unknown move direction '{value}'"
            ))),
        }
    }
}

/// One candidate substitute registered against a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeputyEntry {
    id: DeputyEntryId,
    principal_id: PersonId,
    deputy_id: PersonId,
    scope: DeputyScope,
    rank: u32,
}

impl DeputyEntry {
    /// Rehydrates an entry from storage.
    #[must_use]
    pub fn new(
        id: DeputyEntryId,
        principal_id: PersonId,
        deputy_id: PersonId,
        scope: DeputyScope,
        rank: u32,
    ) -> Self {
        Self {
            id,
            principal_id,
            deputy_id,
            scope,
            rank,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub fn id(&self) -> DeputyEntryId {
        self.id
    }

    /// Returns the person owning this entry.
    #[must_use]
    pub fn principal_id(&self) -> PersonId {
        self.principal_id
    }

    /// Returns the candidate substitute.
    #[must_use]
    pub fn deputy_id(&self) -> PersonId {
        self.deputy_id
    }

    /// Returns the scope bucket.
    #[must_use]
    pub fn scope(&self) -> DeputyScope {
        self.scope
    }

    /// Returns the 0-based rank inside the scope bucket.
    #[must_use]
    pub fn rank(&self) -> u32 {
        self.rank
    }
}

/// A rank change produced by a roster mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankUpdate {
    /// Entry whose rank changed.
    pub entry_id: DeputyEntryId,
    /// New rank of the entry.
    pub rank: u32,
}

/// Result of removing an entry from a roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRemoval {
    /// The removed entry.
    pub removed: DeputyEntry,
    /// Ranks shifted down to close the gap.
    pub rank_updates: Vec<RankUpdate>,
}

/// The complete deputy list of one principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeputyRoster {
    principal_id: PersonId,
    entries: Vec<DeputyEntry>,
}

impl DeputyRoster {
    /// Builds a roster from stored entries, checking ownership and dense ranks.
    pub fn new(principal_id: PersonId, entries: Vec<DeputyEntry>) -> AppResult<Self> {
        if let Some(foreign) = entries
            .iter()
            .find(|entry| entry.principal_id != principal_id)
        {
            return Err(AppError::Internal(format!(
                "deputy entry '{}' belongs to '{}', not to '{principal_id}'",
                foreign.id, foreign.principal_id
            )));
        }

        let mut buckets: HashMap<DeputyScope, Vec<u32>> = HashMap::new();
        for entry in &entries {
            buckets.entry(entry.scope).or_default().push(entry.rank);
        }
        for (scope, mut ranks) in buckets {
            ranks.sort_unstable();
            let dense = ranks
                .iter()
                .enumerate()
                .all(|(index, rank)| u32::try_from(index).is_ok_and(|index| index == *rank));
            if !dense {
                return Err(AppError::Internal(format!(
                    "deputy ranks of '{principal_id}' in scope {scope:?} are not contiguous: {ranks:?}"
                )));
            }
        }

        Ok(Self {
            principal_id,
            entries,
        })
    }

    /// Returns the principal owning the roster.
    #[must_use]
    pub fn principal_id(&self) -> PersonId {
        self.principal_id
    }

    /// Returns all entries in bucket order, then rank order.
    #[must_use]
    pub fn entries(&self) -> Vec<&DeputyEntry> {
        let mut entries: Vec<&DeputyEntry> = self.entries.iter().collect();
        entries.sort_by_key(|entry| (entry.scope, entry.rank));
        entries
    }

    /// Returns the entry with the given id.
    #[must_use]
    pub fn find(&self, entry_id: DeputyEntryId) -> Option<&DeputyEntry> {
        self.entries.iter().find(|entry| entry.id == entry_id)
    }

    /// Returns the number of entries in a bucket.
    #[must_use]
    pub fn bucket_len(&self, scope: DeputyScope) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.scope == scope)
            .count()
    }

    /// Returns the entries usable inside `scope` in trial order.
    ///
    /// Project entries come first, the target project before its ancestors,
    /// each bucket by ascending rank. "All projects" entries follow by rank.
    #[must_use]
    pub fn ordered_for(&self, scope: &ProjectScope) -> Vec<&DeputyEntry> {
        let mut scoped: BTreeMap<(usize, u32), &DeputyEntry> = BTreeMap::new();
        let mut unscoped: BTreeMap<u32, &DeputyEntry> = BTreeMap::new();

        for entry in &self.entries {
            match entry.scope {
                DeputyScope::Project(project_id) => {
                    if let Some(position) = scope.position(project_id) {
                        scoped.insert((position, entry.rank), entry);
                    }
                }
                DeputyScope::AllProjects => {
                    unscoped.insert(entry.rank, entry);
                }
            }
        }

        scoped.into_values().chain(unscoped.into_values()).collect()
    }

    /// Appends a deputy at the next free rank of the bucket.
    pub fn append(&mut self, deputy_id: PersonId, scope: DeputyScope) -> AppResult<DeputyEntry> {
        if deputy_id == self.principal_id {
            return Err(AppError::Validation(
                "a person cannot be registered as their own deputy".to_owned(),
            ));
        }

        if self
            .entries
            .iter()
            .any(|entry| entry.deputy_id == deputy_id && entry.scope == scope)
        {
            return Err(AppError::Conflict(format!(
                "'{deputy_id}' is already a deputy of '{}' in scope {scope:?}",
                self.principal_id
            )));
        }

        let rank = u32::try_from(self.bucket_len(scope)).map_err(|error| {
            AppError::Internal(format!("deputy bucket rank overflow: {error}"))
        })?;
        let entry = DeputyEntry::new(
            DeputyEntryId::new(),
            self.principal_id,
            deputy_id,
            scope,
            rank,
        );
        self.entries.push(entry.clone());

        Ok(entry)
    }

    /// Swaps the entry with its neighbour in the bucket.
    ///
    /// Returns no updates when the entry already sits at the boundary.
    pub fn reorder(
        &mut self,
        entry_id: DeputyEntryId,
        direction: MoveDirection,
    ) -> AppResult<Vec<RankUpdate>> {
        let (scope, rank) = self
            .find(entry_id)
            .map(|entry| (entry.scope, entry.rank))
            .ok_or_else(|| self.missing_entry(entry_id))?;

        let neighbour_rank = match direction {
            MoveDirection::Up => rank.checked_sub(1),
            MoveDirection::Down => rank.checked_add(1),
        };
        let Some(neighbour_rank) = neighbour_rank else {
            return Ok(Vec::new());
        };
        let Some(neighbour_index) = self
            .entries
            .iter()
            .position(|entry| entry.scope == scope && entry.rank == neighbour_rank)
        else {
            return Ok(Vec::new());
        };

        let neighbour = &mut self.entries[neighbour_index];
        neighbour.rank = rank;
        let neighbour_id = neighbour.id;

        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == entry_id) {
            entry.rank = neighbour_rank;
        }

        Ok(vec![
            RankUpdate {
                entry_id,
                rank: neighbour_rank,
            },
            RankUpdate {
                entry_id: neighbour_id,
                rank,
            },
        ])
    }

    /// Removes an entry and shifts the following ranks of its bucket down.
    pub fn remove(&mut self, entry_id: DeputyEntryId) -> AppResult<RosterRemoval> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == entry_id)
            .ok_or_else(|| self.missing_entry(entry_id))?;
        let removed = self.entries.remove(index);

        let mut rank_updates = Vec::new();
        for entry in &mut self.entries {
            if entry.scope == removed.scope && entry.rank > removed.rank {
                entry.rank -= 1;
                rank_updates.push(RankUpdate {
                    entry_id: entry.id,
                    rank: entry.rank,
                });
            }
        }
        rank_updates.sort_by_key(|update| update.rank);

        Ok(RosterRemoval {
            removed,
            rank_updates,
        })
    }

    /// Consumes the roster and returns its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<DeputyEntry> {
        self.entries
    }

    fn missing_entry(&self, entry_id: DeputyEntryId) -> AppError {
        AppError::NotFound(format!(
            "deputy entry '{entry_id}' does not exist for '{}'",
            self.principal_id
        ))
    }
}
