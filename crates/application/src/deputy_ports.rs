mod availability;
mod directory;
mod people;
mod projects;

pub use availability::AvailabilityRepository;
pub use directory::DeputyDirectoryRepository;
pub use people::PersonRepository;
pub use projects::{DeputyPermissionRepository, ProjectRepository};
