//! Opening the `SQLite` file that holds reelmark's local state.
//!
//! The file sits in the platform data directory (`$XDG_DATA_HOME/reelmark`
//! on Linux) unless the caller names a directory, as the CLI's `--dir`
//! does. Every connection gets the same settings and is migrated before it
//! is handed out.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations::run_migrations;

/// Database file name.
const DB_FILE_NAME: &str = "reelmark.db";

/// Application directory inside the platform data directory.
const APP_DIR_NAME: &str = "reelmark";

/// How long a write waits on a lock held by another `reelmark` process.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the reelmark database, creating the file and its directory on
/// first use.
///
/// # Errors
///
/// Returns an error if no data directory can be determined, the file cannot
/// be opened, or migrations fail.
pub fn open_db(dir: Option<&Path>) -> Result<Connection> {
    let path = resolve_db_path(dir)?;
    if let Some(data_dir) = path.parent() {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;
    }

    let conn = Connection::open(&path)
        .with_context(|| format!("failed to open reelmark database {}", path.display()))?;
    let conn = prepare(conn)?;
    tracing::debug!(path = %path.display(), "Database ready");
    Ok(conn)
}

/// Opens a throwaway database with the same settings and schema.
#[cfg(test)]
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    prepare(conn)
}

/// Applies connection settings and brings the schema up to date.
fn prepare(conn: Connection) -> Result<Connection> {
    conn.busy_timeout(BUSY_TIMEOUT).context("failed to set busy timeout")?;
    run_migrations(&conn).context("database migration failed")?;
    Ok(conn)
}

/// `{dir}/reelmark.db`, or `reelmark/reelmark.db` under the platform data
/// directory.
fn resolve_db_path(dir: Option<&Path>) -> Result<PathBuf> {
    let data_dir = match dir {
        Some(d) => d.to_path_buf(),
        None => dirs::data_dir()
            .context("could not determine the data directory")?
            .join(APP_DIR_NAME),
    };
    Ok(data_dir.join(DB_FILE_NAME))
}
