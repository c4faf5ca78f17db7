//! Coverage storage: create, load, update and list coverage entries.

use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use crate::model::{CoverageEntry, WindowSpec};

use super::{Result, Storage, StorageError, parse_column, parse_id};

const COLUMNS: &str = "id, shift_id, covering_user_id, covering_email, cover_start_date, \
     cover_start_time, cover_end_date, cover_end_time, status, created_at";

impl Storage {
    /// Creates a new coverage entry.
    pub fn create_coverage(&self, entry: &CoverageEntry) -> Result<()> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM coverage WHERE id = ?1",
                [entry.id.to_string()],
                |_| Ok(()),
            )
            .optional()?;
        if exists.is_some() {
            return Err(StorageError::CoverageAlreadyExists(entry.id));
        }
        self.conn.execute(
            &format!("INSERT INTO coverage ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"),
            rusqlite::params![
                entry.id.to_string(),
                entry.shift_id.map(|id| id.to_string()),
                &entry.covering_user_id,
                &entry.covering_email,
                &entry.window.start_date,
                &entry.window.start_time,
                &entry.window.end_date,
                &entry.window.end_time,
                entry.status.as_str(),
                entry.created_at.map(|t| t.to_string()),
            ],
        )?;
        Ok(())
    }

    /// Updates every field of an existing coverage entry.
    pub fn update_coverage(&self, entry: &CoverageEntry) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE coverage
             SET shift_id = ?1, covering_user_id = ?2, covering_email = ?3,
                 cover_start_date = ?4, cover_start_time = ?5, cover_end_date = ?6,
                 cover_end_time = ?7, status = ?8, created_at = ?9
             WHERE id = ?10",
            rusqlite::params![
                entry.shift_id.map(|id| id.to_string()),
                &entry.covering_user_id,
                &entry.covering_email,
                &entry.window.start_date,
                &entry.window.start_time,
                &entry.window.end_date,
                &entry.window.end_time,
                entry.status.as_str(),
                entry.created_at.map(|t| t.to_string()),
                entry.id.to_string(),
            ],
        )?;
        if rows == 0 {
            return Err(StorageError::CoverageNotFound(entry.id));
        }
        Ok(())
    }

    /// Loads a single coverage entry.
    pub fn load_coverage(&self, id: Uuid) -> Result<CoverageEntry> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM coverage WHERE id = ?1"),
                [id.to_string()],
                CoverageRow::read,
            )
            .optional()?;
        row.ok_or(StorageError::CoverageNotFound(id))?.into_entry()
    }

    /// Lists the coverage entries referencing a shift, oldest first.
    pub fn list_coverage(&self, shift_id: Uuid) -> Result<Vec<CoverageEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM coverage WHERE shift_id = ?1 ORDER BY created_at, id"
        ))?;
        let rows = stmt.query_map([shift_id.to_string()], CoverageRow::read)?;
        collect_entries(rows)
    }

    /// Lists every stored coverage entry, oldest first.
    pub fn list_all_coverage(&self) -> Result<Vec<CoverageEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM coverage ORDER BY created_at, id"
        ))?;
        let rows = stmt.query_map([], CoverageRow::read)?;
        collect_entries(rows)
    }
}

fn collect_entries(
    rows: impl Iterator<Item = rusqlite::Result<CoverageRow>>,
) -> Result<Vec<CoverageEntry>> {
    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?.into_entry()?);
    }
    Ok(entries)
}

/// A coverage row as stored, before its columns are parsed.
struct CoverageRow {
    id: String,
    shift_id: Option<String>,
    covering_user_id: Option<String>,
    covering_email: Option<String>,
    window: WindowSpec,
    status: String,
    created_at: Option<String>,
}

impl CoverageRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            shift_id: row.get(1)?,
            covering_user_id: row.get(2)?,
            covering_email: row.get(3)?,
            window: WindowSpec {
                start_date: row.get(4)?,
                start_time: row.get(5)?,
                end_date: row.get(6)?,
                end_time: row.get(7)?,
            },
            status: row.get(8)?,
            created_at: row.get(9)?,
        })
    }

    fn into_entry(self) -> Result<CoverageEntry> {
        let created_at = self
            .created_at
            .as_deref()
            .map(|raw| {
                raw.parse::<jiff::Timestamp>()
                    .map_err(|e| StorageError::Corrupt(format!("invalid created_at: {e}")))
            })
            .transpose()?;

        Ok(CoverageEntry {
            id: parse_id(&self.id, "coverage id")?,
            shift_id: self
                .shift_id
                .as_deref()
                .map(|raw| parse_id(raw, "shift id"))
                .transpose()?,
            covering_user_id: self.covering_user_id,
            covering_email: self.covering_email,
            window: self.window,
            status: parse_column(&self.status)?,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;
    use tempfile::TempDir;

    use crate::model::CoverageStatus;

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("roster.sqlite")).unwrap();
        (dir, storage)
    }

    fn sample_entry(shift_id: Option<Uuid>, created: i64) -> CoverageEntry {
        CoverageEntry {
            id: Uuid::new_v4(),
            shift_id,
            covering_user_id: Some("sam".into()),
            covering_email: None,
            window: WindowSpec {
                start_date: Some("2026-03-02".into()),
                start_time: Some("12:00".into()),
                end_date: Some("2026-03-02".into()),
                end_time: Some("16:00".into()),
            },
            status: CoverageStatus::Approved,
            created_at: Some(Timestamp::new(created, 0).unwrap()),
        }
    }

    #[test]
    fn create_and_load_coverage() {
        let (_dir, storage) = test_storage();
        let entry = sample_entry(Some(Uuid::new_v4()), 1_700_000_000);

        storage.create_coverage(&entry).unwrap();

        assert_eq!(storage.load_coverage(entry.id).unwrap(), entry);
    }

    #[test]
    fn create_duplicate_coverage_fails() {
        let (_dir, storage) = test_storage();
        let entry = sample_entry(None, 1_700_000_000);

        storage.create_coverage(&entry).unwrap();
        let err = storage.create_coverage(&entry).unwrap_err();

        assert!(matches!(err, StorageError::CoverageAlreadyExists(_)));
    }

    #[test]
    fn update_coverage_status() {
        let (_dir, storage) = test_storage();
        let mut entry = sample_entry(None, 1_700_000_000);
        storage.create_coverage(&entry).unwrap();

        entry.status = CoverageStatus::Cancelled;
        storage.update_coverage(&entry).unwrap();

        let loaded = storage.load_coverage(entry.id).unwrap();
        assert_eq!(loaded.status, CoverageStatus::Cancelled);
    }

    #[test]
    fn update_nonexistent_coverage_fails() {
        let (_dir, storage) = test_storage();
        let err = storage
            .update_coverage(&sample_entry(None, 1_700_000_000))
            .unwrap_err();

        assert!(matches!(err, StorageError::CoverageNotFound(_)));
    }

    #[test]
    fn list_coverage_filters_by_shift() {
        let (_dir, storage) = test_storage();
        let shift = Uuid::new_v4();

        let later = sample_entry(Some(shift), 1_700_000_100);
        let earlier = sample_entry(Some(shift), 1_700_000_000);
        storage.create_coverage(&later).unwrap();
        storage.create_coverage(&earlier).unwrap();
        storage
            .create_coverage(&sample_entry(Some(Uuid::new_v4()), 1_700_000_000))
            .unwrap();
        storage
            .create_coverage(&sample_entry(None, 1_700_000_000))
            .unwrap();

        let entries = storage.list_coverage(shift).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, earlier.id);
        assert_eq!(entries[1].id, later.id);

        assert_eq!(storage.list_all_coverage().unwrap().len(), 4);
    }

    #[test]
    fn delete_shift_removes_its_coverage() {
        let (_dir, storage) = test_storage();
        let shift = crate::model::Shift::new(Uuid::new_v4(), "dana", WindowSpec::default());
        storage.create_shift(&shift).unwrap();
        storage
            .create_coverage(&sample_entry(Some(shift.id), 1_700_000_000))
            .unwrap();

        storage.delete_shift(shift.id).unwrap();

        assert!(storage.list_coverage(shift.id).unwrap().is_empty());
    }
}
