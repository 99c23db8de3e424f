//! Application services and ports.

#![forbid(unsafe_code)]

mod availability_service;
mod deputy_directory_service;
mod deputy_management_service;
mod deputy_ports;
mod deputy_resolver;
mod host_ports;
mod project_scope_resolver;
mod resolution_engine;
mod resolution_settings;

#[cfg(test)]
mod test_fakes;

pub use availability_service::AvailabilityService;
pub use deputy_directory_service::DeputyDirectoryService;
pub use deputy_management_service::{
    DeputyListing, DeputyManagementService, DeputyProjectOption,
};
pub use deputy_ports::{
    AvailabilityRepository, DeputyDirectoryRepository, DeputyPermissionRepository,
    PersonRepository, ProjectRepository,
};
pub use deputy_resolver::DeputyResolver;
pub use host_ports::{AssignableItem, ChangeRecord, DiagnosticEntry, DiagnosticSink};
pub use project_scope_resolver::ProjectScopeResolver;
pub use resolution_engine::{
    AvailabilityResolutionEngine, ResolutionContext, ResolutionFault, ResolutionOutcome,
};
pub use resolution_settings::{
    DEFAULT_REASSIGNMENT_NOTE, DEFAULT_UNAVAILABILITY_ERROR, ResolutionSettings,
};
