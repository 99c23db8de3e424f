//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_deputy_repository;
mod postgres_availability_repository;
mod postgres_deputy_directory_repository;
mod postgres_deputy_permission_repository;
mod runtime;
mod settings;
mod tracing_diagnostic_sink;

#[cfg(test)]
mod postgres_test_support;

pub use in_memory_deputy_repository::InMemoryDeputyRepository;
pub use postgres_availability_repository::PostgresAvailabilityRepository;
pub use postgres_deputy_directory_repository::PostgresDeputyDirectoryRepository;
pub use postgres_deputy_permission_repository::PostgresDeputyPermissionRepository;
pub use runtime::{connect_pool, init_tracing};
pub use settings::{load_settings, settings_from_lookup};
pub use tracing_diagnostic_sink::TracingDiagnosticSink;
