#![allow(dead_code)]

use chrono::NaiveDate;
use clientbook_core::db::open_db_in_memory;
use clientbook_core::{Client, ClientId, ClientRepository, SqliteClientRepository};
use rusqlite::Connection;

pub const SEEDED_CLIENTS: u64 = 12;
pub const CAROLINA_ID: ClientId = 4;

/// Twelve clients: one "Carolina", five with income >= 4000, one born in
/// 1949, none in 1946, nine born after 1948.
pub fn seed_clients() -> Vec<Client> {
    [
        ("Conceição Evaristo", (1996, 12, 3), 1500.0, 2),
        ("Lázaro Ramos", (1978, 7, 1), 2500.0, 2),
        ("Clarice Lispector", (1960, 4, 13), 3800.0, 2),
        ("Carolina Maria de Jesus", (1985, 3, 14), 7500.0, 2),
        ("Gilberto Gil", (1949, 5, 18), 2500.0, 4),
        ("Djamila Ribeiro", (1975, 11, 10), 4500.0, 1),
        ("Jorge Amado", (1940, 8, 10), 10000.0, 2),
        ("Toni Morrison", (1945, 2, 18), 10000.0, 2),
        ("Chimamanda Adichie", (1956, 9, 23), 1500.0, 2),
        ("Silvio Almeida", (1976, 7, 9), 4500.0, 3),
        ("Machado de Assis", (1948, 6, 21), 3000.0, 0),
        ("Yuval Harari", (1976, 2, 24), 1500.0, 0),
    ]
    .into_iter()
    .map(|(name, (y, m, d), income, children)| Client::new(name, date(y, m, d), income, children))
    .collect()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// In-memory SQLite database holding the seeded clients with ids 1..=12.
pub fn seeded_db() -> Connection {
    let conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteClientRepository::try_new(&conn).unwrap();
        for client in seed_clients() {
            repo.insert(&client).unwrap();
        }
    }
    conn
}

/// Attaches one dependent account row to `client_id`.
pub fn add_account(conn: &Connection, client_id: ClientId) {
    conn.execute(
        "INSERT INTO client_accounts (client_id, label) VALUES (?1, 'checking');",
        [client_id],
    )
    .unwrap();
}
