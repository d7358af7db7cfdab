mod common;

use clientbook_core::db::migrations::latest_version;
use clientbook_core::db::open_db_in_memory;
use clientbook_core::{
    Client, ClientRepository, ClientValidationError, PageRequest, RepoError,
    SqliteClientRepository,
};
use common::{add_account, date, seeded_db, CAROLINA_ID, SEEDED_CLIENTS};
use rusqlite::Connection;

#[test]
fn delete_removes_existing_client() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    repo.delete_by_id(1).unwrap();

    assert!(repo.get_by_id(1).unwrap().is_none());
    assert_eq!(repo.count().unwrap(), SEEDED_CLIENTS - 1);
}

#[test]
fn delete_missing_id_returns_not_found() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let err = repo.delete_by_id(i64::MAX).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == i64::MAX));
    assert_eq!(repo.count().unwrap(), SEEDED_CLIENTS);
}

#[test]
fn delete_client_with_accounts_is_integrity_violation() {
    let conn = seeded_db();
    add_account(&conn, CAROLINA_ID);
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let err = repo.delete_by_id(CAROLINA_ID).unwrap_err();
    assert!(matches!(err, RepoError::IntegrityViolation(id) if id == CAROLINA_ID));
    assert!(repo.get_by_id(CAROLINA_ID).unwrap().is_some());
}

#[test]
fn insert_assigns_next_sequential_id() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let client = Client::new("Milton Santos", date(1926, 5, 3), 6000.0, 1);
    let stored = repo.insert(&client).unwrap();

    assert_eq!(stored.id, Some(SEEDED_CLIENTS as i64 + 1));
    assert_eq!(repo.count().unwrap(), SEEDED_CLIENTS + 1);
    let loaded = repo.get_by_id(stored.id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded, stored);
}

#[test]
fn insert_ignores_supplied_id() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let client = Client::new("Milton Santos", date(1926, 5, 3), 6000.0, 1).with_id(1);
    let stored = repo.insert(&client).unwrap();

    assert_eq!(stored.id, Some(13));
    assert_eq!(
        repo.get_by_id(1).unwrap().unwrap().name,
        "Conceição Evaristo"
    );
}

#[test]
fn deleted_ids_are_not_reused() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    repo.delete_by_id(12).unwrap();
    let stored = repo
        .insert(&Client::new("Milton Santos", date(1926, 5, 3), 6000.0, 1))
        .unwrap();
    assert_eq!(stored.id, Some(13));
}

#[test]
fn replace_changes_and_persists_fields() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let mut client = repo.get_by_id(1).unwrap().unwrap();
    client.name = "Carol".to_string();
    client.income = 1800.0;
    repo.replace(&client).unwrap();

    let loaded = repo.get_by_id(1).unwrap().unwrap();
    assert_eq!(loaded.name, "Carol");
    assert_eq!(loaded.income, 1800.0);
    assert_eq!(repo.list_all().unwrap().len() as u64, SEEDED_CLIENTS);
}

#[test]
fn replace_missing_id_returns_not_found() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let client = Client::new("Carol", date(1990, 1, 1), 1.0, 0).with_id(1000);
    let err = repo.replace(&client).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(1000)));

    let unsaved = Client::new("Carol", date(1990, 1, 1), 1.0, 0);
    assert!(matches!(repo.replace(&unsaved), Err(RepoError::MissingId)));
}

#[test]
fn validation_failure_blocks_insert_and_replace() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let invalid = Client::new("NaN", date(1990, 1, 1), f64::NAN, 0);
    assert!(matches!(
        repo.insert(&invalid),
        Err(RepoError::Validation(_))
    ));

    let mut existing = repo.get_by_id(2).unwrap().unwrap();
    existing.income = f64::INFINITY;
    assert!(matches!(
        repo.replace(&existing),
        Err(RepoError::Validation(_))
    ));
    assert_eq!(repo.get_by_id(2).unwrap().unwrap().income, 2500.0);
}

#[test]
fn birth_year_beyond_four_digits_is_rejected_on_write() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let far_future = Client::new("Far Future", date(10000, 1, 1), 1000.0, 0);
    assert!(matches!(
        repo.insert(&far_future),
        Err(RepoError::Validation(
            ClientValidationError::BirthYearOutOfRange(10000)
        ))
    ));

    let mut existing = repo.get_by_id(3).unwrap().unwrap();
    existing.birth_date = date(-5, 1, 1);
    assert!(matches!(
        repo.replace(&existing),
        Err(RepoError::Validation(_))
    ));
    assert_eq!(repo.count().unwrap(), SEEDED_CLIENTS);
    assert_eq!(
        repo.find_by_birth_year_after(1948, &PageRequest::of(0, 20).unwrap())
            .unwrap()
            .total_elements(),
        9
    );
}

#[test]
fn list_all_is_ordered_by_id() {
    let conn = seeded_db();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    let ids: Vec<_> = repo
        .list_all()
        .unwrap()
        .into_iter()
        .map(|client| client.id.unwrap())
        .collect();
    assert_eq!(ids, (1..=12).collect::<Vec<_>>());
}

#[test]
fn invalid_persisted_birth_date_is_reported() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO clients (name, birth_date, income, children)
         VALUES ('Broken', 'not-a-date', 1.0, 0);",
        [],
    )
    .unwrap();
    let repo = SqliteClientRepository::try_new(&conn).unwrap();

    assert!(matches!(repo.get_by_id(1), Err(RepoError::InvalidData(_))));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteClientRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_clients_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteClientRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("clients"))
    ));
}

#[test]
fn repository_rejects_connection_missing_client_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE clients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            birth_date TEXT NOT NULL,
            income REAL NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteClientRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "clients",
            column: "children"
        })
    ));
}
