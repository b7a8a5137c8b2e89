//! Transfer representations and inbound validation.
//!
//! # Responsibility
//! - Define the wire-neutral `PersonRecord` / `AddressRecord` shapes.
//! - Turn raw records into validated input types the registry accepts.
//!
//! # Invariants
//! - `NewPerson`, `PersonDraft` and `ValidatedAddress` can only be obtained
//!   through validation.
//! - Validation failures are reported here and never by the registry service.

mod record;
mod validate;

pub use record::{AddressRecord, PersonRecord};
pub use validate::{
    validate_address, validate_new_person, validate_person_update, FieldViolation, NewPerson,
    PersonDraft, ValidatedAddress, ValidationError,
};
