//! Environment-driven runtime configuration.
//!
//! # Responsibility
//! - Resolve database path and logging settings for embedding binaries.
//!
//! # Invariants
//! - Blank variables behave exactly like unset ones.
//! - Resolution never fails; invalid log settings surface at `init_logging`.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "CLIENTBOOK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "CLIENTBOOK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CLIENTBOOK_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "clientbook.sqlite3";

/// Resolved core settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Requested log level, validated later by `init_logging`.
    pub log_level: String,
    /// Log directory; file logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        }
    }
}
