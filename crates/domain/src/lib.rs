//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod availability;
mod deputy;
mod identifiers;
mod person;
mod project;
mod resolution;

pub use availability::{AvailabilityCalendar, UnavailabilityWindow, ensure_non_overlapping};
pub use deputy::{
    DeputyEntry, DeputyRoster, DeputyScope, MoveDirection, RankUpdate, RosterRemoval,
};
pub use identifiers::{DeputyEntryId, GroupId, PersonId, ProjectId};
pub use person::{Assignee, Group, Person};
pub use project::{Project, ProjectScope};
pub use resolution::{ItemField, RejectionDetails, resolve_check_date};
