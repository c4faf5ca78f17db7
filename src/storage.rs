//! Local persistence for shifts and coverage entries.
//!
//! Everything lives in one `SQLite` file (by default `~/.shiftcover/roster.sqlite`):
//!
//! ```text
//! shift     # one row per shift, active request stored as JSON
//! coverage  # one row per coverage entry, optionally referencing a shift
//! ```
//!
//! The store is plain CRUD. Lifecycle rules live in [`crate::roster`].

mod coverage;
mod shift;

use std::{fs, io, path::Path, path::PathBuf};

use rusqlite::Connection;
use uuid::Uuid;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("shift not found: {0}")]
    ShiftNotFound(Uuid),

    #[error("shift already exists: {0}")]
    ShiftAlreadyExists(Uuid),

    #[error("coverage entry not found: {0}")]
    CoverageNotFound(Uuid),

    #[error("coverage entry already exists: {0}")]
    CoverageAlreadyExists(Uuid),

    #[error("corrupt data: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS shift (
        id               TEXT PRIMARY KEY,
        original_user_id TEXT NOT NULL,
        start_date       TEXT,
        start_time       TEXT,
        end_date         TEXT,
        end_time         TEXT,
        status           TEXT NOT NULL,
        request_type     TEXT,
        swap_start_date  TEXT,
        swap_start_time  TEXT,
        swap_end_date    TEXT,
        swap_end_time    TEXT,
        active_request   TEXT
    );
    CREATE TABLE IF NOT EXISTS coverage (
        id               TEXT PRIMARY KEY,
        shift_id         TEXT,
        covering_user_id TEXT,
        covering_email   TEXT,
        cover_start_date TEXT,
        cover_start_time TEXT,
        cover_end_date   TEXT,
        cover_end_time   TEXT,
        status           TEXT NOT NULL,
        created_at       TEXT
    );
    CREATE INDEX IF NOT EXISTS coverage_shift ON coverage (shift_id);
";

/// Local `SQLite` storage for the roster.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens the database at `path`, creating the file, its parent
    /// directory and the schema as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Returns the default database path: `~/.shiftcover/roster.sqlite`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".shiftcover").join("roster.sqlite"))
    }
}

/// Parses a stored id column.
fn parse_id(raw: &str, column: &str) -> Result<Uuid> {
    raw.parse()
        .map_err(|e| StorageError::Corrupt(format!("invalid {column}: {e}")))
}

/// Parses a stored enum column.
fn parse_column<T: std::str::FromStr<Err = String>>(raw: &str) -> Result<T> {
    raw.parse().map_err(StorageError::Corrupt)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn open_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("roster.sqlite");

        Storage::open(&path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn reopening_keeps_the_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("roster.sqlite");

        Storage::open(&path).unwrap();
        let storage = Storage::open(&path).unwrap();
        assert!(storage.list_shifts().unwrap().is_empty());
    }

    #[test]
    fn corrupt_ids_are_reported() {
        let err = parse_id("not-a-uuid", "shift id").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)));
    }
}
