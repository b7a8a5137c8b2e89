//! Core logic for the person registry.
//! This crate owns the tax-code and address-deduplication invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod transfer;

pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::address::{Address, AddressFields, AddressId};
pub use model::person::{normalize_tax_code, Person};
pub use repo::address_repo::{AddressRepository, SqliteAddressRepository};
pub use repo::person_repo::{PersonRepository, SqlitePersonRepository};
pub use repo::{RepoError, RepoResult};
pub use service::registry_service::{
    find_or_create_address, AddressLink, RegistryError, RegistryResult, RegistryService,
};
pub use transfer::{
    validate_address, validate_new_person, validate_person_update, AddressRecord, NewPerson,
    PersonDraft, PersonRecord, ValidatedAddress, ValidationError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
