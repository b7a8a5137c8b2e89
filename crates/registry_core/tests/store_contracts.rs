use registry_core::db::open_db_in_memory;
use registry_core::{
    AddressFields, AddressRepository, Person, PersonRepository, RepoError,
    SqliteAddressRepository, SqlitePersonRepository,
};

fn via_roma() -> AddressFields {
    AddressFields::new("Via Roma", "10", "Milano", "MI", "Italy")
}

fn person(tax_code: &str, name: &str, address_id: i64) -> Person {
    Person {
        tax_code: tax_code.to_string(),
        name: name.to_string(),
        surname: "Rossi".to_string(),
        address_id,
    }
}

#[test]
fn address_insert_then_find_exact() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAddressRepository::try_new(&conn).unwrap();

    let inserted = repo.insert(&via_roma()).unwrap();
    let found = repo.find_exact(&via_roma()).unwrap().unwrap();
    assert_eq!(found, inserted);
    assert_eq!(repo.find_by_id(inserted.id).unwrap(), Some(inserted));
}

#[test]
fn address_lookup_is_case_sensitive() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAddressRepository::try_new(&conn).unwrap();
    repo.insert(&via_roma()).unwrap();

    let lower_street = AddressFields::new("via roma", "10", "Milano", "MI", "Italy");
    assert!(repo.find_exact(&lower_street).unwrap().is_none());
}

#[test]
fn duplicate_address_insert_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAddressRepository::try_new(&conn).unwrap();
    repo.insert(&via_roma()).unwrap();

    let err = repo.insert(&via_roma()).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Conflict {
            constraint: "uk_address_fields"
        }
    ));
}

#[test]
fn schema_rejects_blank_fields_and_malformed_province() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAddressRepository::try_new(&conn).unwrap();

    for bad in [
        AddressFields::new("", "10", "Milano", "MI", "Italy"),
        AddressFields::new("Via Roma", "  ", "Milano", "MI", "Italy"),
        AddressFields::new("Via Roma", "10", "", "MI", "Italy"),
        AddressFields::new("Via Roma", "10", "Milano", "M1", "Italy"),
        AddressFields::new("Via Roma", "10", "Milano", "MIL", "Italy"),
        AddressFields::new("Via Roma", "10", "Milano", "mi", "Italy"),
        AddressFields::new("Via Roma", "10", "Milano", "MI", ""),
    ] {
        let err = repo.insert(&bad).unwrap_err();
        assert!(matches!(err, RepoError::Db(_)), "{bad:?} should be rejected");
    }
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM pr_address;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn address_ids_are_fresh_per_insert() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAddressRepository::try_new(&conn).unwrap();

    let first = repo.insert(&via_roma()).unwrap();
    let second = repo
        .insert(&AddressFields::new("Via Roma", "12", "Milano", "MI", "Italy"))
        .unwrap();
    assert_ne!(first.id, second.id);
}

#[test]
fn person_save_is_an_upsert_and_keeps_list_order() {
    let conn = open_db_in_memory().unwrap();
    let addresses = SqliteAddressRepository::try_new(&conn).unwrap();
    let people = SqlitePersonRepository::try_new(&conn).unwrap();
    let address = addresses.insert(&via_roma()).unwrap();

    people.save(&person("AAAAAAAAAAAAAAA1", "Mario", address.id)).unwrap();
    people.save(&person("BBBBBBBBBBBBBBB2", "Luigi", address.id)).unwrap();
    people.save(&person("AAAAAAAAAAAAAAA1", "Marco", address.id)).unwrap();

    assert!(people.exists_by_tax_code("AAAAAAAAAAAAAAA1").unwrap());
    let listed = people.list_all().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].tax_code, "AAAAAAAAAAAAAAA1");
    assert_eq!(listed[0].name, "Marco");
    assert_eq!(listed[1].tax_code, "BBBBBBBBBBBBBBB2");
}

#[test]
fn person_delete_leaves_address_row() {
    let conn = open_db_in_memory().unwrap();
    let addresses = SqliteAddressRepository::try_new(&conn).unwrap();
    let people = SqlitePersonRepository::try_new(&conn).unwrap();
    let address = addresses.insert(&via_roma()).unwrap();
    let mario = person("AAAAAAAAAAAAAAA1", "Mario", address.id);
    people.save(&mario).unwrap();

    people.delete(&mario).unwrap();
    people.delete(&mario).unwrap();

    assert!(!people.exists_by_tax_code("AAAAAAAAAAAAAAA1").unwrap());
    assert!(people.find_by_tax_code("AAAAAAAAAAAAAAA1").unwrap().is_none());
    assert!(addresses.find_by_id(address.id).unwrap().is_some());
}

#[test]
fn person_save_requires_existing_address() {
    let conn = open_db_in_memory().unwrap();
    let people = SqlitePersonRepository::try_new(&conn).unwrap();

    let err = people
        .save(&person("AAAAAAAAAAAAAAA1", "Mario", 999))
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn referenced_address_cannot_be_deleted() {
    let conn = open_db_in_memory().unwrap();
    let addresses = SqliteAddressRepository::try_new(&conn).unwrap();
    let people = SqlitePersonRepository::try_new(&conn).unwrap();
    let address = addresses.insert(&via_roma()).unwrap();
    people.save(&person("AAAAAAAAAAAAAAA1", "Mario", address.id)).unwrap();

    let result = conn.execute("DELETE FROM pr_address WHERE id = ?1;", [address.id]);
    assert!(result.is_err());
}
