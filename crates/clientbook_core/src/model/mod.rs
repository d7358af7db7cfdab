//! Client domain model.
//!
//! # Responsibility
//! - Define the stored `Client` entity and its `ClientDto` transfer shape.
//! - Own field validation shared by every store implementation.
//!
//! # Invariants
//! - Every stored client is identified by a unique `ClientId`.
//! - Entity and transfer object map field-by-field in both directions.

pub mod client;
