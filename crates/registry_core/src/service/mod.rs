//! Registry use-case services.
//!
//! # Responsibility
//! - Enforce cross-entity invariants (tax code uniqueness, address dedup).
//! - Own the transaction boundary of every public registry operation.

pub mod registry_service;
