//! Client use-case service.
//!
//! # Responsibility
//! - Bridge `ClientDto` callers and `Client` store entities.
//! - Map store absence/integrity signals to `ServiceError` kinds.
//!
//! # Invariants
//! - `update` fails with `NotFound` before any mutation when the id is
//!   unknown, and always keeps the path id.
//! - `insert` never forwards a caller-supplied id.
//! - Errors are surfaced unchanged; nothing is retried or swallowed.

use crate::model::client::{ClientDto, ClientId, ClientValidationError};
use crate::query::page::{InvalidPageRequest, Page, PageRequest};
use crate::repo::client_repo::{ClientRepository, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Domain error kinds returned by [`ClientService`].
#[derive(Debug)]
pub enum ServiceError {
    /// No live client with this id.
    NotFound(ClientId),
    /// The store refused the mutation because of dependent records.
    Conflict(ClientId),
    /// Caller input rejected before reaching the store.
    InvalidArgument(String),
    /// Any other persistence failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Stable machine-readable code for logs and callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Repo(_) => "repo_error",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "client not found: {id}"),
            Self::Conflict(id) => write!(f, "integrity violation: client {id} has dependents"),
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::IntegrityViolation(id) => Self::Conflict(id),
            RepoError::Validation(err) => Self::InvalidArgument(err.to_string()),
            other => Self::Repo(other),
        }
    }
}

impl From<InvalidPageRequest> for ServiceError {
    fn from(value: InvalidPageRequest) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

impl From<ClientValidationError> for ServiceError {
    fn from(value: ClientValidationError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

/// Client service facade over a repository implementation.
pub struct ClientService<R: ClientRepository> {
    repo: R,
}

impl<R: ClientRepository> ClientService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the underlying store.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn find_by_id(&self, id: ClientId) -> ServiceResult<ClientDto> {
        self.repo
            .get_by_id(id)?
            .map(ClientDto::from)
            .ok_or(ServiceError::NotFound(id))
    }

    pub fn find_all_paged(&self, page: &PageRequest) -> ServiceResult<Page<ClientDto>> {
        Ok(self.repo.find_all(page)?.map(ClientDto::from))
    }

    /// Clients with `income >= threshold`.
    ///
    /// # Errors
    /// - `InvalidArgument` when `threshold` is NaN.
    pub fn find_by_income(
        &self,
        threshold: f64,
        page: &PageRequest,
    ) -> ServiceResult<Page<ClientDto>> {
        if threshold.is_nan() {
            return Err(ServiceError::InvalidArgument(
                "income threshold must be a number".to_string(),
            ));
        }
        Ok(self
            .repo
            .find_by_income_at_least(threshold, page)?
            .map(ClientDto::from))
    }

    /// Clients whose name contains `name`, ignoring case.
    pub fn find_by_name(&self, name: &str, page: &PageRequest) -> ServiceResult<Page<ClientDto>> {
        Ok(self
            .repo
            .find_by_name_contains(name, page)?
            .map(ClientDto::from))
    }

    pub fn find_by_birth_year(
        &self,
        year: i32,
        page: &PageRequest,
    ) -> ServiceResult<Page<ClientDto>> {
        Ok(self
            .repo
            .find_by_birth_year(year, page)?
            .map(ClientDto::from))
    }

    /// Clients born in a year strictly after `year`.
    pub fn find_by_birth_year_after(
        &self,
        year: i32,
        page: &PageRequest,
    ) -> ServiceResult<Page<ClientDto>> {
        Ok(self
            .repo
            .find_by_birth_year_after(year, page)?
            .map(ClientDto::from))
    }

    /// Persists a new client and returns it with the store-assigned id.
    pub fn insert(&self, dto: &ClientDto) -> ServiceResult<ClientDto> {
        let mut entity = dto.to_entity();
        entity.id = None;
        entity.validate()?;

        let stored = self.repo.insert(&entity)?;
        info!(
            "event=client_insert module=service status=ok client_id={}",
            stored.id.unwrap_or_default()
        );
        Ok(stored.into())
    }

    /// Replaces every field of client `id` with `dto`, keeping `id`.
    pub fn update(&self, id: ClientId, dto: &ClientDto) -> ServiceResult<ClientDto> {
        if self.repo.get_by_id(id)?.is_none() {
            warn!("event=client_update module=service status=not_found client_id={id}");
            return Err(ServiceError::NotFound(id));
        }

        let entity = dto.to_entity().with_id(id);
        entity.validate()?;
        self.repo.replace(&entity)?;
        info!("event=client_update module=service status=ok client_id={id}");
        Ok(entity.into())
    }

    pub fn delete(&self, id: ClientId) -> ServiceResult<()> {
        match self.repo.delete_by_id(id) {
            Ok(()) => {
                info!("event=client_delete module=service status=ok client_id={id}");
                Ok(())
            }
            Err(err) => {
                let err = ServiceError::from(err);
                warn!(
                    "event=client_delete module=service status=error client_id={id} error_code={}",
                    err.code()
                );
                Err(err)
            }
        }
    }
}
