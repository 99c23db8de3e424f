//! People and the assignee variants a work item can carry.

use autodeputy_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{GroupId, PersonId};

/// An individual person who can hold work and act as a deputy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    id: PersonId,
    name: NonEmptyString,
}

impl Person {
    /// Creates a person with a validated display name.
    pub fn new(id: PersonId, name: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
        })
    }

    /// Returns the person identifier.
    #[must_use]
    pub fn id(&self) -> PersonId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// A team or group assignee. Groups never get deputies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    name: NonEmptyString,
}

impl Group {
    /// Creates a group with a validated display name.
    pub fn new(id: GroupId, name: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
        })
    }

    /// Returns the group identifier.
    #[must_use]
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Assignee of a work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assignee {
    /// A single capability holder.
    Individual(Person),
    /// A group of people.
    Group(Group),
}

impl Assignee {
    /// Returns the person when the assignee is an individual.
    #[must_use]
    pub fn as_individual(&self) -> Option<&Person> {
        match self {
            Self::Individual(person) => Some(person),
            Self::Group(_) => None,
        }
    }

    /// Returns whether the assignee is an individual capability holder.
    #[must_use]
    pub fn is_capability_holder(&self) -> bool {
        matches!(self, Self::Individual(_))
    }

    /// Returns the display name of the assignee.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Individual(person) => person.name(),
            Self::Group(group) => group.name(),
        }
    }
}

impl From<Person> for Assignee {
    fn from(value: Person) -> Self {
        Self::Individual(value)
    }
}
