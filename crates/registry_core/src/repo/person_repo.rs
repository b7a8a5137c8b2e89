//! Person Store over `pr_person`.
//!
//! # Invariants
//! - Keys passed in are expected to be normalized (uppercase) already.
//! - `list_all` iterates in insertion (rowid) order; `save` keeps the rowid of
//!   an existing row, so updates never reorder the listing.
//! - `delete` removes only the person row; the referenced address stays.

use crate::model::person::Person;
use crate::repo::{ensure_registry_connection_ready, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const PERSON_SELECT_SQL: &str = "SELECT
    tax_code,
    name,
    surname,
    address_id
FROM pr_person";

/// Person Store contract.
pub trait PersonRepository {
    fn exists_by_tax_code(&self, tax_code: &str) -> RepoResult<bool>;
    fn find_by_tax_code(&self, tax_code: &str) -> RepoResult<Option<Person>>;
    /// Full scan in natural order.
    fn list_all(&self) -> RepoResult<Vec<Person>>;
    /// Inserts or replaces the row keyed by `person.tax_code`.
    fn save(&self, person: &Person) -> RepoResult<()>;
    /// Removes the row. Missing rows are ignored.
    fn delete(&self, person: &Person) -> RepoResult<()>;
}

/// SQLite-backed Person Store.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Creates a store after checking the connection schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_registry_connection_ready(conn)?;
        Ok(Self { conn })
    }

    pub(crate) fn new_ready(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn exists_by_tax_code(&self, tax_code: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM pr_person
                WHERE tax_code = ?1
            );",
            [tax_code],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn find_by_tax_code(&self, tax_code: &str) -> RepoResult<Option<Person>> {
        let person = self
            .conn
            .query_row(
                &format!("{PERSON_SELECT_SQL} WHERE tax_code = ?1;"),
                [tax_code],
                parse_person_row,
            )
            .optional()?;
        Ok(person)
    }

    fn list_all(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }
        Ok(people)
    }

    fn save(&self, person: &Person) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO pr_person (
                tax_code,
                name,
                surname,
                address_id
            ) VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (tax_code) DO UPDATE SET
                name = excluded.name,
                surname = excluded.surname,
                address_id = excluded.address_id;",
            params![
                person.tax_code.as_str(),
                person.name.as_str(),
                person.surname.as_str(),
                person.address_id,
            ],
        )?;
        Ok(())
    }

    fn delete(&self, person: &Person) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM pr_person WHERE tax_code = ?1;",
            [person.tax_code.as_str()],
        )?;
        Ok(())
    }
}

fn parse_person_row(row: &Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        tax_code: row.get("tax_code")?,
        name: row.get("name")?,
        surname: row.get("surname")?,
        address_id: row.get("address_id")?,
    })
}
