//! Typed client queries and pagination.
//!
//! # Responsibility
//! - Describe client searches as typed filters with pure predicates.
//! - Describe page windows, ordering and result envelopes.
//!
//! # Invariants
//! - Filtering happens before windowing; the two never interact.
//! - Page totals always count every match, not only the returned slice.

pub mod filter;
pub mod page;
