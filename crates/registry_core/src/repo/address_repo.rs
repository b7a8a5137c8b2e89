//! Address Store: exact-match lookup and insert over `pr_address`.
//!
//! # Invariants
//! - Lookups compare all five fields with SQLite's binary collation, so
//!   matching is exact and case-sensitive.
//! - `insert` does not check for an existing tuple; the
//!   `uk_address_fields` constraint is the only guard.

use crate::model::address::{Address, AddressFields, AddressId};
use crate::repo::{ensure_registry_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ADDRESS_SELECT_SQL: &str = "SELECT
    id,
    street,
    street_no,
    city,
    province,
    country
FROM pr_address";

pub(crate) const ADDRESS_UNIQUE_CONSTRAINT: &str = "uk_address_fields";

/// Address Store contract.
pub trait AddressRepository {
    /// Returns the row whose five fields equal `fields` exactly.
    fn find_exact(&self, fields: &AddressFields) -> RepoResult<Option<Address>>;
    /// Inserts a new row and returns it with its fresh id.
    ///
    /// Returns `RepoError::Conflict` when the tuple already exists.
    fn insert(&self, fields: &AddressFields) -> RepoResult<Address>;
    /// Resolves a surrogate id, used when following a person's reference.
    fn find_by_id(&self, id: AddressId) -> RepoResult<Option<Address>>;
}

/// SQLite-backed Address Store.
pub struct SqliteAddressRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAddressRepository<'conn> {
    /// Creates a store after checking the connection schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_registry_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Creates a store over a connection already known to be ready.
    pub(crate) fn new_ready(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AddressRepository for SqliteAddressRepository<'_> {
    fn find_exact(&self, fields: &AddressFields) -> RepoResult<Option<Address>> {
        let address = self
            .conn
            .query_row(
                &format!(
                    "{ADDRESS_SELECT_SQL}
                     WHERE street = ?1
                       AND street_no = ?2
                       AND city = ?3
                       AND province = ?4
                       AND country = ?5;"
                ),
                params![
                    fields.street.as_str(),
                    fields.street_no.as_str(),
                    fields.city.as_str(),
                    fields.province.as_str(),
                    fields.country.as_str(),
                ],
                parse_address_row,
            )
            .optional()?;
        Ok(address)
    }

    fn insert(&self, fields: &AddressFields) -> RepoResult<Address> {
        let inserted = self.conn.execute(
            "INSERT INTO pr_address (
                street,
                street_no,
                city,
                province,
                country
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                fields.street.as_str(),
                fields.street_no.as_str(),
                fields.city.as_str(),
                fields.province.as_str(),
                fields.country.as_str(),
            ],
        );

        match inserted {
            Ok(_) => Ok(Address {
                id: self.conn.last_insert_rowid(),
                fields: fields.clone(),
            }),
            Err(err) if is_unique_violation(&err) => Err(RepoError::Conflict {
                constraint: ADDRESS_UNIQUE_CONSTRAINT,
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn find_by_id(&self, id: AddressId) -> RepoResult<Option<Address>> {
        let address = self
            .conn
            .query_row(
                &format!("{ADDRESS_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_address_row,
            )
            .optional()?;
        Ok(address)
    }
}

fn parse_address_row(row: &Row<'_>) -> rusqlite::Result<Address> {
    Ok(Address {
        id: row.get("id")?,
        fields: AddressFields {
            street: row.get("street")?,
            street_no: row.get("street_no")?,
            city: row.get("city")?,
            province: row.get("province")?,
            country: row.get("country")?,
        },
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
