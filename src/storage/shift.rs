//! Shift storage: create, load, update, list and delete shifts.

use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use crate::model::{ActiveRequest, Shift, WindowSpec};

use super::{Result, Storage, StorageError, parse_column, parse_id};

const COLUMNS: &str = "id, original_user_id, start_date, start_time, end_date, end_time, status, \
     request_type, swap_start_date, swap_start_time, swap_end_date, swap_end_time, active_request";

impl Storage {
    /// Creates a new shift.
    pub fn create_shift(&self, shift: &Shift) -> Result<()> {
        if self.shift_exists(shift.id)? {
            return Err(StorageError::ShiftAlreadyExists(shift.id));
        }
        let request = encode_request(shift.active_request.as_ref())?;
        self.conn.execute(
            &format!(
                "INSERT INTO shift ({COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
            ),
            rusqlite::params![
                shift.id.to_string(),
                &shift.original_user_id,
                &shift.window.start_date,
                &shift.window.start_time,
                &shift.window.end_date,
                &shift.window.end_time,
                shift.status.as_str(),
                shift.request_type.map(|t| t.as_str()),
                &shift.swap_window.start_date,
                &shift.swap_window.start_time,
                &shift.swap_window.end_date,
                &shift.swap_window.end_time,
                request,
            ],
        )?;
        Ok(())
    }

    /// Updates every field of an existing shift.
    pub fn update_shift(&self, shift: &Shift) -> Result<()> {
        let request = encode_request(shift.active_request.as_ref())?;
        let rows = self.conn.execute(
            "UPDATE shift
             SET original_user_id = ?1, start_date = ?2, start_time = ?3, end_date = ?4,
                 end_time = ?5, status = ?6, request_type = ?7, swap_start_date = ?8,
                 swap_start_time = ?9, swap_end_date = ?10, swap_end_time = ?11,
                 active_request = ?12
             WHERE id = ?13",
            rusqlite::params![
                &shift.original_user_id,
                &shift.window.start_date,
                &shift.window.start_time,
                &shift.window.end_date,
                &shift.window.end_time,
                shift.status.as_str(),
                shift.request_type.map(|t| t.as_str()),
                &shift.swap_window.start_date,
                &shift.swap_window.start_time,
                &shift.swap_window.end_date,
                &shift.swap_window.end_time,
                request,
                shift.id.to_string(),
            ],
        )?;
        if rows == 0 {
            return Err(StorageError::ShiftNotFound(shift.id));
        }
        Ok(())
    }

    /// Loads a single shift.
    pub fn load_shift(&self, id: Uuid) -> Result<Shift> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM shift WHERE id = ?1"),
                [id.to_string()],
                ShiftRow::read,
            )
            .optional()?;
        row.ok_or(StorageError::ShiftNotFound(id))?.into_shift()
    }

    /// Lists all shifts, earliest first.
    pub fn list_shifts(&self) -> Result<Vec<Shift>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM shift ORDER BY start_date, start_time, id"
        ))?;
        let rows = stmt.query_map([], ShiftRow::read)?;
        let mut shifts = Vec::new();
        for row in rows {
            shifts.push(row?.into_shift()?);
        }
        Ok(shifts)
    }

    /// Deletes a shift together with its coverage entries.
    pub fn delete_shift(&self, id: Uuid) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let rows = tx.execute("DELETE FROM shift WHERE id = ?1", [id.to_string()])?;
        if rows == 0 {
            return Err(StorageError::ShiftNotFound(id));
        }
        tx.execute("DELETE FROM coverage WHERE shift_id = ?1", [id.to_string()])?;
        tx.commit()?;
        Ok(())
    }

    /// Whether a shift with this id is stored.
    pub fn shift_exists(&self, id: Uuid) -> Result<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM shift WHERE id = ?1", [id.to_string()], |_| {
                Ok(())
            })
            .optional()?;
        Ok(found.is_some())
    }
}

fn encode_request(request: Option<&ActiveRequest>) -> Result<Option<String>> {
    Ok(request.map(serde_json::to_string).transpose()?)
}

/// A shift row as stored, before its columns are parsed.
struct ShiftRow {
    id: String,
    original_user_id: String,
    window: WindowSpec,
    status: String,
    request_type: Option<String>,
    swap_window: WindowSpec,
    active_request: Option<String>,
}

impl ShiftRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            original_user_id: row.get(1)?,
            window: WindowSpec {
                start_date: row.get(2)?,
                start_time: row.get(3)?,
                end_date: row.get(4)?,
                end_time: row.get(5)?,
            },
            status: row.get(6)?,
            request_type: row.get(7)?,
            swap_window: WindowSpec {
                start_date: row.get(8)?,
                start_time: row.get(9)?,
                end_date: row.get(10)?,
                end_time: row.get(11)?,
            },
            active_request: row.get(12)?,
        })
    }

    fn into_shift(self) -> Result<Shift> {
        Ok(Shift {
            id: parse_id(&self.id, "shift id")?,
            original_user_id: self.original_user_id,
            window: self.window,
            status: parse_column(&self.status)?,
            request_type: self
                .request_type
                .as_deref()
                .map(parse_column)
                .transpose()?,
            swap_window: self.swap_window,
            active_request: self
                .active_request
                .as_deref()
                .map(serde_json::from_str)
                .transpose()?,
        })
    }
}
