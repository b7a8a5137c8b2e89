//! Registry Service: create/read/update/delete/search over people.
//!
//! # Responsibility
//! - Normalize keys, reject duplicate tax codes, deduplicate addresses.
//! - Map persisted rows to `PersonRecord` for callers.
//!
//! # Invariants
//! - Each public operation runs in exactly one SQLite transaction; nothing is
//!   committed unless the whole operation succeeds.
//! - Tax codes are never changed after creation.
//! - Address rows are reused by exact normalized tuple and never deleted, even
//!   when no person references them anymore.
//! - The only suppressed failure is a dangling address reference while
//!   mapping, which yields `address: None`.

use crate::model::address::{Address, AddressFields, AddressId};
use crate::model::person::{mask_tax_code, normalize_tax_code, Person};
use crate::repo::address_repo::{AddressRepository, SqliteAddressRepository};
use crate::repo::person_repo::{PersonRepository, SqlitePersonRepository};
use crate::repo::{ensure_registry_connection_ready, RepoError};
use crate::transfer::{AddressRecord, NewPerson, PersonDraft, PersonRecord, ValidatedAddress};
use log::{debug, info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry operation failure.
#[derive(Debug)]
pub enum RegistryError {
    /// Create with an already registered tax code.
    DuplicateKey(String),
    /// Get or update on an unknown tax code.
    NotFound(String),
    /// Address insert kept losing the uniqueness race after one retry.
    Conflict(AddressFields),
    /// Any other store failure, passed through unchanged.
    Repo(RepoError),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey(tax_code) => write!(f, "tax code already exists: {tax_code}"),
            Self::NotFound(tax_code) => write!(f, "person not found: {tax_code}"),
            Self::Conflict(fields) => write!(
                f,
                "concurrent address insert conflict for {}, {}, {} ({}), {}",
                fields.street, fields.street_no, fields.city, fields.province, fields.country
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RegistryError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for RegistryError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

/// Outcome of following a person's address reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressLink {
    Resolved(Address),
    /// The referenced row does not exist.
    Dangling(AddressId),
}

impl AddressLink {
    fn into_record(self) -> Option<AddressRecord> {
        match self {
            Self::Resolved(address) => Some(AddressRecord::from(&address.fields)),
            Self::Dangling(_) => None,
        }
    }
}

/// Returns the stored address equal to the normalized `fields`, inserting it
/// when absent.
///
/// An existing row is returned as stored. When the insert loses a uniqueness
/// race the whole lookup is repeated once; a second conflict is returned as
/// `RegistryError::Conflict`.
pub fn find_or_create_address<A>(repo: &A, fields: &AddressFields) -> RegistryResult<Address>
where
    A: AddressRepository + ?Sized,
{
    let normalized = fields.normalized();
    match lookup_or_insert(repo, &normalized) {
        Err(RepoError::Conflict { constraint }) => {
            warn!(
                "event=address_resolve module=service status=retry constraint={}",
                constraint
            );
            lookup_or_insert(repo, &normalized).map_err(|err| match err {
                RepoError::Conflict { .. } => RegistryError::Conflict(normalized.clone()),
                other => other.into(),
            })
        }
        other => other.map_err(Into::into),
    }
}

fn lookup_or_insert<A>(repo: &A, fields: &AddressFields) -> Result<Address, RepoError>
where
    A: AddressRepository + ?Sized,
{
    if let Some(existing) = repo.find_exact(fields)? {
        return Ok(existing);
    }
    let created = repo.insert(fields)?;
    debug!(
        "event=address_insert module=service status=ok address_id={}",
        created.id
    );
    Ok(created)
}

/// Follows `person.address_id`.
pub fn resolve_address_link<A>(repo: &A, person: &Person) -> Result<AddressLink, RepoError>
where
    A: AddressRepository + ?Sized,
{
    Ok(match repo.find_by_id(person.address_id)? {
        Some(address) => AddressLink::Resolved(address),
        None => AddressLink::Dangling(person.address_id),
    })
}

/// Maps a person row to its transfer shape, omitting an unresolvable address.
pub fn to_person_record<A>(repo: &A, person: Person) -> RegistryResult<PersonRecord>
where
    A: AddressRepository + ?Sized,
{
    let link = resolve_address_link(repo, &person)?;
    if let AddressLink::Dangling(address_id) = &link {
        warn!(
            "event=person_map module=service status=degraded tax_code={} address_id={} reason=dangling_address",
            mask_tax_code(&person.tax_code),
            address_id
        );
    }
    Ok(PersonRecord {
        tax_code: person.tax_code,
        name: person.name,
        surname: person.surname,
        address: link.into_record(),
    })
}

/// Normalizes a search query: trimmed and lowercased, `None` when empty.
pub fn normalize_search_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Registry facade over a migrated SQLite connection.
///
/// The connection must not already be inside a transaction.
pub struct RegistryService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> RegistryService<'conn> {
    /// Creates a service after checking the connection schema.
    pub fn try_new(conn: &'conn Connection) -> RegistryResult<Self> {
        ensure_registry_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Registers a new person.
    ///
    /// Fails with `DuplicateKey` when the tax code exists in any case variant;
    /// nothing is written in that case.
    pub fn create(&self, person: &NewPerson) -> RegistryResult<()> {
        let tax_code = normalize_tax_code(person.tax_code());
        let draft = person.draft();
        let result = self.write(|addresses, people| {
            if people.exists_by_tax_code(&tax_code)? {
                return Err(RegistryError::DuplicateKey(tax_code.clone()));
            }
            let address = find_or_create_address(addresses, draft.address().fields())?;
            people.save(&Person {
                tax_code: tax_code.clone(),
                name: draft.name().to_string(),
                surname: draft.surname().to_string(),
                address_id: address.id,
            })?;
            Ok(())
        });
        log_outcome("person_create", &tax_code, &result);
        result
    }

    /// Resolves an address on its own, inserting it when absent.
    pub fn find_or_create_address(&self, address: &ValidatedAddress) -> RegistryResult<Address> {
        self.write(|addresses, _| find_or_create_address(addresses, address.fields()))
    }

    /// Loads one person by tax code, case-insensitively.
    pub fn get(&self, tax_code: &str) -> RegistryResult<PersonRecord> {
        let tax_code = normalize_tax_code(tax_code);
        self.read(|addresses, people| {
            let person = people
                .find_by_tax_code(&tax_code)?
                .ok_or_else(|| RegistryError::NotFound(tax_code.clone()))?;
            to_person_record(addresses, person)
        })
    }

    /// Lists every person in insertion order.
    pub fn list(&self) -> RegistryResult<Vec<PersonRecord>> {
        self.read(|addresses, people| {
            people
                .list_all()?
                .into_iter()
                .map(|person| to_person_record(addresses, person))
                .collect()
        })
    }

    /// Returns people whose name or surname contains `query`, ignoring case.
    ///
    /// A blank query matches nobody.
    pub fn search_by_name(&self, query: &str) -> RegistryResult<Vec<PersonRecord>> {
        let Some(needle) = normalize_search_query(query) else {
            return Ok(Vec::new());
        };
        self.read(|addresses, people| {
            people
                .list_all()?
                .into_iter()
                .filter(|person| person.name_matches(&needle))
                .map(|person| to_person_record(addresses, person))
                .collect()
        })
    }

    /// Overwrites name, surname and address of an existing person.
    ///
    /// The previous address row stays in place even if now unreferenced.
    pub fn update(&self, tax_code: &str, draft: &PersonDraft) -> RegistryResult<()> {
        let tax_code = normalize_tax_code(tax_code);
        let result = self.write(|addresses, people| {
            let mut person = people
                .find_by_tax_code(&tax_code)?
                .ok_or_else(|| RegistryError::NotFound(tax_code.clone()))?;
            let address = find_or_create_address(addresses, draft.address().fields())?;
            person.name = draft.name().to_string();
            person.surname = draft.surname().to_string();
            person.address_id = address.id;
            people.save(&person)?;
            Ok(())
        });
        log_outcome("person_update", &tax_code, &result);
        result
    }

    /// Removes a person if present. Unknown tax codes are a no-op.
    pub fn delete(&self, tax_code: &str) -> RegistryResult<()> {
        let tax_code = normalize_tax_code(tax_code);
        let result = self.write(|_, people| {
            if let Some(person) = people.find_by_tax_code(&tax_code)? {
                people.delete(&person)?;
            }
            Ok(())
        });
        log_outcome("person_delete", &tax_code, &result);
        result
    }

    fn read<T, F>(&self, work: F) -> RegistryResult<T>
    where
        F: FnOnce(&SqliteAddressRepository<'_>, &SqlitePersonRepository<'_>) -> RegistryResult<T>,
    {
        self.in_transaction(TransactionBehavior::Deferred, work)
    }

    fn write<T, F>(&self, work: F) -> RegistryResult<T>
    where
        F: FnOnce(&SqliteAddressRepository<'_>, &SqlitePersonRepository<'_>) -> RegistryResult<T>,
    {
        self.in_transaction(TransactionBehavior::Immediate, work)
    }

    fn in_transaction<T, F>(
        &self,
        behavior: TransactionBehavior,
        work: F,
    ) -> RegistryResult<T>
    where
        F: FnOnce(&SqliteAddressRepository<'_>, &SqlitePersonRepository<'_>) -> RegistryResult<T>,
    {
        let tx = Transaction::new_unchecked(self.conn, behavior)?;
        let value = {
            let addresses = SqliteAddressRepository::new_ready(&tx);
            let people = SqlitePersonRepository::new_ready(&tx);
            work(&addresses, &people)?
        };
        tx.commit()?;
        Ok(value)
    }
}

fn log_outcome(event: &str, tax_code: &str, result: &RegistryResult<()>) {
    let masked = mask_tax_code(tax_code);
    match result {
        Ok(()) => info!("event={event} module=service status=ok tax_code={masked}"),
        Err(RegistryError::Repo(err)) => {
            warn!("event={event} module=service status=error tax_code={masked} error={err}")
        }
        Err(err) => {
            info!("event={event} module=service status=rejected tax_code={masked} reason={err}")
        }
    }
}
