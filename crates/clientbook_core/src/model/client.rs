//! Client entity and transfer object.
//!
//! # Responsibility
//! - Define the canonical stored client record.
//! - Provide the caller-facing `ClientDto` and its 1:1 conversions.
//!
//! # Invariants
//! - `id` is `None` only before the first insert; stores assign it.
//! - `income` is always finite once persisted.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned client identifier.
pub type ClientId = i64;

pub const MIN_BIRTH_YEAR: i32 = 0;
pub const MAX_BIRTH_YEAR: i32 = 9999;

/// Validation failure for client fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClientValidationError {
    /// `income` is NaN or infinite and cannot be compared against thresholds.
    NonFiniteIncome(f64),
    /// Birth year outside `0..=9999`; SQLite date functions cannot read it.
    BirthYearOutOfRange(i32),
}

impl Display for ClientValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteIncome(value) => write!(f, "client income must be finite, got {value}"),
            Self::BirthYearOutOfRange(year) => write!(
                f,
                "client birth year must be within {MIN_BIRTH_YEAR}..={MAX_BIRTH_YEAR}, got {year}"
            ),
        }
    }
}

impl Error for ClientValidationError {}

/// Canonical stored client record.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    /// Unique id. `None` until the store assigns one on insert.
    pub id: Option<ClientId>,
    pub name: String,
    pub birth_date: NaiveDate,
    /// Monthly income; searches use `>=` threshold semantics.
    pub income: f64,
    pub children: i32,
}

impl Client {
    /// Creates an unsaved client (no id yet).
    pub fn new(name: impl Into<String>, birth_date: NaiveDate, income: f64, children: i32) -> Self {
        Self {
            id: None,
            name: name.into(),
            birth_date,
            income,
            children,
        }
    }

    /// Returns a copy carrying the given id.
    pub fn with_id(mut self, id: ClientId) -> Self {
        self.id = Some(id);
        self
    }

    /// Calendar year of `birth_date`, used by year filters.
    pub fn birth_year(&self) -> i32 {
        self.birth_date.year()
    }

    /// Checks field constraints enforced on every write path.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        if !self.income.is_finite() {
            return Err(ClientValidationError::NonFiniteIncome(self.income));
        }
        let year = self.birth_year();
        if !(MIN_BIRTH_YEAR..=MAX_BIRTH_YEAR).contains(&year) {
            return Err(ClientValidationError::BirthYearOutOfRange(year));
        }
        Ok(())
    }
}

/// Transfer object exchanged with callers.
///
/// Serialized in camelCase (`birthDate`) with ISO-8601 dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    #[serde(default)]
    pub id: Option<ClientId>,
    pub name: String,
    pub birth_date: NaiveDate,
    pub income: f64,
    #[serde(default)]
    pub children: i32,
}

impl ClientDto {
    /// Converts to entity form, keeping every field as-is.
    pub fn to_entity(&self) -> Client {
        Client {
            id: self.id,
            name: self.name.clone(),
            birth_date: self.birth_date,
            income: self.income,
            children: self.children,
        }
    }
}

impl From<&Client> for ClientDto {
    fn from(value: &Client) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            birth_date: value.birth_date,
            income: value.income,
            children: value.children,
        }
    }
}

impl From<Client> for ClientDto {
    fn from(value: Client) -> Self {
        Self {
            id: value.id,
            name: value.name,
            birth_date: value.birth_date,
            income: value.income,
            children: value.children,
        }
    }
}
