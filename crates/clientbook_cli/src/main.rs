//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `clientbook_core` linkage and database bootstrap.
//! - Keep output deterministic `key=value` lines for quick sanity checks.

use clientbook_core::db::open_db;
use clientbook_core::{init_logging, ClientRepository, CoreConfig, SqliteClientRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("clientbook_core ping={}", clientbook_core::ping());
    println!("clientbook_core version={}", clientbook_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = CoreConfig::from_env();
    if let Some(log_dir) = config.log_dir.as_ref() {
        init_logging(&config.log_level, &log_dir.to_string_lossy())?;
    }

    println!("db_path={}", config.db_path.display());
    let conn = open_db(&config.db_path).map_err(|err| format!("db open failed: {err}"))?;
    let repo =
        SqliteClientRepository::try_new(&conn).map_err(|err| format!("repo init failed: {err}"))?;
    let clients = repo.count().map_err(|err| err.to_string())?;
    println!("clients={clients}");
    log::info!("event=cli_probe module=cli status=ok clients={clients}");
    Ok(())
}
