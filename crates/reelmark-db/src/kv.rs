//! Key/value operations on the `kv` table.
//!
//! Values are opaque text; callers decide the encoding (JSON for the
//! watch list).

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension};

/// Loads the value stored under `key`, or `None` when the key is absent.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
        row.get(0)
    })
    .optional()
    .with_context(|| format!("failed to load value for key {key}"))
}

/// Stores `value` under `key`, replacing any previous value.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn save_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let updated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    conn.execute(
        "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        rusqlite::params![key, value, updated_at],
    )
    .with_context(|| format!("failed to save value for key {key}"))?;

    tracing::debug!(key, bytes = value.len(), "Value saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::connection::{open_db, open_in_memory};

    #[test]
    fn test_load_missing_key_is_none() {
        // Arrange
        let conn = open_in_memory().unwrap();

        // Act
        let value = load_value(&conn, "watchList").unwrap();

        // Assert
        assert!(value.is_none());
    }

    #[test]
    fn test_save_then_overwrite() {
        // Arrange
        let conn = open_in_memory().unwrap();

        // Act
        save_value(&conn, "watchList", "[]").unwrap();
        save_value(&conn, "watchList", r#"[{"id":1}]"#).unwrap();

        // Assert
        assert_eq!(
            load_value(&conn, "watchList").unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );
        let rows: u32 = conn
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_save_records_updated_at() {
        // Arrange
        let conn = open_in_memory().unwrap();

        // Act
        save_value(&conn, "k", "v").unwrap();

        // Assert
        let updated_at: String = conn
            .query_row("SELECT updated_at FROM kv WHERE key = 'k'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&updated_at).is_ok());
    }

    #[test]
    fn test_value_survives_reopen() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        {
            let conn = open_db(Some(dir.path())).unwrap();
            save_value(&conn, "watchList", "[1]").unwrap();
        }

        // Act
        let conn = open_db(Some(dir.path())).unwrap();

        // Assert
        assert_eq!(
            load_value(&conn, "watchList").unwrap().as_deref(),
            Some("[1]")
        );
    }
}
