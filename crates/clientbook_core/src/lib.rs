//! Core domain logic for clientbook.
//! Client records, typed search filters, pagination and the service layer
//! that maps store failures to domain error kinds.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::client::{Client, ClientDto, ClientId, ClientValidationError};
pub use query::filter::ClientFilter;
pub use query::page::{InvalidPageRequest, Page, PageRequest, Sort, SortDirection, SortField};
pub use repo::client_repo::{ClientRepository, RepoError, RepoResult, SqliteClientRepository};
pub use repo::memory_repo::InMemoryClientRepository;
pub use service::client_service::{ClientService, ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
