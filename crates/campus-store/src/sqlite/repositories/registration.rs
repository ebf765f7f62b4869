//! Registration repository — the `registrations` table.
//!
//! The `(student_id, event_id)` primary key is the only arbiter of duplicate
//! registrations, including concurrent ones.

use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::{Result, StoreError, is_key_conflict};
use crate::sqlite::repositories::now;
use crate::sqlite::row_types::RegistrationRow;

/// Registration repository — stateless, every method takes `&Connection`.
pub struct RegistrationRepo;

impl RegistrationRepo {
    /// Register a student for an event, stamped with the current time.
    ///
    /// Fails with [`StoreError::AlreadyRegistered`] if the pair exists.
    pub fn insert(conn: &Connection, student_id: &str, event_id: &str) -> Result<RegistrationRow> {
        let registered_on = now();
        let _ = conn
            .execute(
                "INSERT INTO registrations (student_id, event_id, registered_on) VALUES (?1, ?2, ?3)",
                params![student_id, event_id, registered_on],
            )
            .map_err(|e| {
                if is_key_conflict(&e) {
                    StoreError::AlreadyRegistered {
                        student_id: student_id.to_string(),
                        event_id: event_id.to_string(),
                    }
                } else {
                    e.into()
                }
            })?;
        Ok(RegistrationRow {
            student_id: student_id.to_string(),
            event_id: event_id.to_string(),
            registered_on,
        })
    }

    /// Insert unless the pair exists. Returns whether a row was inserted.
    pub fn insert_if_absent(conn: &Connection, student_id: &str, event_id: &str) -> Result<bool> {
        let changed = conn.execute(
            "INSERT INTO registrations (student_id, event_id, registered_on) VALUES (?1, ?2, ?3)
             ON CONFLICT(student_id, event_id) DO NOTHING",
            params![student_id, event_id, now()],
        )?;
        Ok(changed > 0)
    }

    /// Get the registration for a pair.
    pub fn get(conn: &Connection, student_id: &str, event_id: &str) -> Result<Option<RegistrationRow>> {
        let row = conn
            .query_row(
                "SELECT student_id, event_id, registered_on FROM registrations
                 WHERE student_id = ?1 AND event_id = ?2",
                params![student_id, event_id],
                |row| {
                    Ok(RegistrationRow {
                        student_id: row.get(0)?,
                        event_id: row.get(1)?,
                        registered_on: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Number of registrations for an event (cancelled or not).
    pub fn count_for_event(conn: &Connection, event_id: &str) -> Result<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM registrations WHERE event_id = ?1",
            params![event_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
