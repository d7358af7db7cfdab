//! Typed client filters.
//!
//! # Responsibility
//! - Name each supported client search as one enum variant.
//! - Evaluate each variant as a pure predicate over a `Client`.
//!
//! # Invariants
//! - Name matching folds case with [`fold_case`] on both sides.
//! - An empty name needle matches every client.

use crate::model::client::Client;

/// One client search criterion.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientFilter {
    /// Every client.
    All,
    /// `income >= threshold`.
    IncomeAtLeast(f64),
    /// Case-insensitive substring of `name`.
    NameContains(String),
    /// Birth year equals the value.
    BirthYear(i32),
    /// Birth year strictly greater than the value.
    BirthYearAfter(i32),
}

impl ClientFilter {
    /// Returns whether `client` satisfies this filter.
    pub fn matches(&self, client: &Client) -> bool {
        match self {
            Self::All => true,
            Self::IncomeAtLeast(threshold) => client.income >= *threshold,
            Self::NameContains(needle) => {
                needle.is_empty() || fold_case(&client.name).contains(&fold_case(needle))
            }
            Self::BirthYear(year) => client.birth_year() == *year,
            Self::BirthYearAfter(year) => client.birth_year() > *year,
        }
    }

    /// Stable label used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::IncomeAtLeast(_) => "income_at_least",
            Self::NameContains(_) => "name_contains",
            Self::BirthYear(_) => "birth_year",
            Self::BirthYearAfter(_) => "birth_year_after",
        }
    }
}

/// Locale-independent lowercase used for name matching.
///
/// Folds one character at a time so the result does not depend on the
/// surrounding word (final sigma folds to `σ`, never `ς`).
pub fn fold_case(value: &str) -> String {
    value.chars().flat_map(char::to_lowercase).collect()
}
