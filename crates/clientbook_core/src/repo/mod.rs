//! Client store contracts and implementations.
//!
//! # Responsibility
//! - Define the `ClientRepository` contract consumed by the service layer.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths call `Client::validate()` before persistence.
//! - Absence and integrity rejections surface as typed `RepoError`s, never
//!   as raw driver errors.

pub mod client_repo;
pub mod memory_repo;
