//! Domain records for the person registry.
//!
//! # Responsibility
//! - Define persisted shapes for people and shared addresses.
//! - Own the case-folding rules applied before comparison or storage.
//!
//! # Invariants
//! - A person references exactly one address by surrogate id.
//! - An address is identified by its five-field tuple; the id is only a handle.

pub mod address;
pub mod person;
