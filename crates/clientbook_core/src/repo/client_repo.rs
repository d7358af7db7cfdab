//! Client repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and paged search over the `clients` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Each `ClientFilter` variant maps to one fixed SQL fragment; caller data
//!   only ever reaches SQLite as bound parameters.
//! - Ordering always ends with `id ASC`, so pages are stable.
//! - Read paths reject invalid persisted rows instead of masking them.

use chrono::NaiveDate;
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{is_foreign_key_violation, DbError};
use crate::model::client::{Client, ClientId, ClientValidationError};
use crate::query::filter::{fold_case, ClientFilter};
use crate::query::page::{Page, PageRequest, Sort, SortDirection, SortField};
use log::debug;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CLIENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    birth_date,
    income,
    children
FROM clients";

const CLIENT_COLUMNS: &[&str] = &["id", "name", "birth_date", "income", "children"];

/// SQL scalar function applying [`fold_case`] inside queries.
const FOLD_CASE_SQL_FN: &str = "clientbook_fold_case";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for client persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ClientValidationError),
    Db(DbError),
    /// No live client with this id.
    NotFound(ClientId),
    /// Deleting this client would orphan dependent records.
    IntegrityViolation(ClientId),
    /// Replacement requested for a client that has no id.
    MissingId,
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "client not found: {id}"),
            Self::IntegrityViolation(id) => {
                write!(f, "client {id} is referenced by dependent records")
            }
            Self::MissingId => write!(f, "client has no id"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "client repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "client repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "client repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted client data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClientValidationError> for RepoError {
    fn from(value: ClientValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store contract for client records.
///
/// The provided `find_by_*` methods are thin wrappers over [`find_page`]
/// and need no per-store code.
///
/// [`find_page`]: ClientRepository::find_page
pub trait ClientRepository {
    fn get_by_id(&self, id: ClientId) -> RepoResult<Option<Client>>;
    /// Persists a new client. Any id on `client` is ignored.
    fn insert(&self, client: &Client) -> RepoResult<Client>;
    /// Replaces every field of the stored client with `client.id`.
    fn replace(&self, client: &Client) -> RepoResult<()>;
    fn delete_by_id(&self, id: ClientId) -> RepoResult<()>;
    /// Every client, ordered by id.
    fn list_all(&self) -> RepoResult<Vec<Client>>;
    fn count(&self) -> RepoResult<u64>;
    /// Filters, counts, then windows the result.
    fn find_page(&self, filter: &ClientFilter, page: &PageRequest) -> RepoResult<Page<Client>>;

    fn find_all(&self, page: &PageRequest) -> RepoResult<Page<Client>> {
        self.find_page(&ClientFilter::All, page)
    }

    fn find_by_income_at_least(
        &self,
        threshold: f64,
        page: &PageRequest,
    ) -> RepoResult<Page<Client>> {
        self.find_page(&ClientFilter::IncomeAtLeast(threshold), page)
    }

    fn find_by_name_contains(&self, name: &str, page: &PageRequest) -> RepoResult<Page<Client>> {
        self.find_page(&ClientFilter::NameContains(name.to_string()), page)
    }

    fn find_by_birth_year(&self, year: i32, page: &PageRequest) -> RepoResult<Page<Client>> {
        self.find_page(&ClientFilter::BirthYear(year), page)
    }

    fn find_by_birth_year_after(&self, year: i32, page: &PageRequest) -> RepoResult<Page<Client>> {
        self.find_page(&ClientFilter::BirthYearAfter(year), page)
    }
}

/// SQLite-backed client repository.
pub struct SqliteClientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClientRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not have the client shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_client_connection_ready(conn)?;
        register_fold_case(conn)?;
        Ok(Self { conn })
    }
}

impl ClientRepository for SqliteClientRepository<'_> {
    fn get_by_id(&self, id: ClientId) -> RepoResult<Option<Client>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CLIENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_client_row(row)?));
        }
        Ok(None)
    }

    fn insert(&self, client: &Client) -> RepoResult<Client> {
        client.validate()?;

        self.conn.execute(
            "INSERT INTO clients (name, birth_date, income, children)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                client.name.as_str(),
                client.birth_date,
                client.income,
                client.children,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        Ok(client.clone().with_id(id))
    }

    fn replace(&self, client: &Client) -> RepoResult<()> {
        client.validate()?;
        let id = client.id.ok_or(RepoError::MissingId)?;

        let changed = self.conn.execute(
            "UPDATE clients
             SET
                name = ?1,
                birth_date = ?2,
                income = ?3,
                children = ?4
             WHERE id = ?5;",
            params![
                client.name.as_str(),
                client.birth_date,
                client.income,
                client.children,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete_by_id(&self, id: ClientId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM clients WHERE id = ?1;", [id])
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    RepoError::IntegrityViolation(id)
                } else {
                    RepoError::from(err)
                }
            })?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn list_all(&self) -> RepoResult<Vec<Client>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CLIENT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut clients = Vec::new();
        while let Some(row) = rows.next()? {
            clients.push(parse_client_row(row)?);
        }
        Ok(clients)
    }

    fn count(&self) -> RepoResult<u64> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM clients;", [], |row| row.get(0))?;
        Ok(total.unsigned_abs())
    }

    fn find_page(&self, filter: &ClientFilter, page: &PageRequest) -> RepoResult<Page<Client>> {
        let (predicate, filter_values) = filter_sql(filter);

        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM clients WHERE {predicate};"),
            params_from_iter(filter_values.iter()),
            |row| row.get(0),
        )?;

        let sql = format!(
            "{CLIENT_SELECT_SQL} WHERE {predicate} ORDER BY {} LIMIT ? OFFSET ?;",
            order_by_sql(page.sort())
        );
        let mut bind_values = filter_values;
        bind_values.push(Value::Integer(i64::from(page.size())));
        bind_values.push(Value::Integer(
            i64::try_from(page.offset()).unwrap_or(i64::MAX),
        ));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut clients = Vec::new();
        while let Some(row) = rows.next()? {
            clients.push(parse_client_row(row)?);
        }

        debug!(
            "event=client_query module=repo status=ok filter={} page={} size={} total={} returned={}",
            filter.kind(),
            page.page(),
            page.size(),
            total,
            clients.len()
        );
        Ok(Page::new(clients, page, total.unsigned_abs()))
    }
}

/// Maps one filter to its fixed SQL predicate plus bound values.
fn filter_sql(filter: &ClientFilter) -> (&'static str, Vec<Value>) {
    match filter {
        ClientFilter::All => ("1 = 1", Vec::new()),
        ClientFilter::IncomeAtLeast(threshold) => ("income >= ?", vec![Value::Real(*threshold)]),
        ClientFilter::NameContains(needle) => (
            "(? = '' OR instr(clientbook_fold_case(name), clientbook_fold_case(?)) > 0)",
            vec![Value::Text(needle.clone()), Value::Text(needle.clone())],
        ),
        ClientFilter::BirthYear(year) => (
            "CAST(strftime('%Y', birth_date) AS INTEGER) = ?",
            vec![Value::Integer(i64::from(*year))],
        ),
        ClientFilter::BirthYearAfter(year) => (
            "CAST(strftime('%Y', birth_date) AS INTEGER) > ?",
            vec![Value::Integer(i64::from(*year))],
        ),
    }
}

fn order_by_sql(sort: Option<Sort>) -> String {
    let Some(sort) = sort else {
        return "id ASC".to_string();
    };
    let column = match sort.field {
        SortField::Id => "id",
        SortField::Name => "name",
        SortField::BirthDate => "birth_date",
        SortField::Income => "income",
        SortField::Children => "children",
    };
    let direction = match sort.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };
    if sort.field == SortField::Id {
        format!("id {direction}")
    } else {
        format!("{column} {direction}, id ASC")
    }
}

fn parse_client_row(row: &Row<'_>) -> RepoResult<Client> {
    let id: ClientId = row.get("id")?;
    let birth_date: NaiveDate = row.get("birth_date").map_err(|err| {
        RepoError::InvalidData(format!("invalid birth_date for client {id}: {err}"))
    })?;

    let client = Client {
        id: Some(id),
        name: row.get("name")?,
        birth_date,
        income: row.get("income")?,
        children: row.get("children")?,
    };
    client.validate()?;
    Ok(client)
}

fn register_fold_case(conn: &Connection) -> RepoResult<()> {
    conn.create_scalar_function(
        FOLD_CASE_SQL_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|text| fold_case(&text)))
        },
    )?;
    Ok(())
}

fn ensure_client_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "clients")? {
        return Err(RepoError::MissingRequiredTable("clients"));
    }
    for column in CLIENT_COLUMNS {
        if !table_has_column(conn, "clients", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "clients",
                column,
            });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
