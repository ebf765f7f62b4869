//! Attendance repository — the `attendance` table.

use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::Result;
use crate::sqlite::repositories::now;
use crate::sqlite::row_types::AttendanceRow;

/// Attendance repository — stateless, every method takes `&Connection`.
pub struct AttendanceRepo;

impl AttendanceRepo {
    /// Record attendance for a pair. An existing record is overwritten,
    /// including its check-in timestamp.
    pub fn upsert(
        conn: &Connection,
        student_id: &str,
        event_id: &str,
        attended: bool,
    ) -> Result<AttendanceRow> {
        let checked_in_at = now();
        let _ = conn.execute(
            "INSERT INTO attendance (student_id, event_id, attended, checked_in_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(student_id, event_id) DO UPDATE
             SET attended = excluded.attended, checked_in_at = excluded.checked_in_at",
            params![student_id, event_id, attended, checked_in_at],
        )?;
        Ok(AttendanceRow {
            student_id: student_id.to_string(),
            event_id: event_id.to_string(),
            attended,
            checked_in_at,
        })
    }

    /// Get the attendance record for a pair.
    pub fn get(conn: &Connection, student_id: &str, event_id: &str) -> Result<Option<AttendanceRow>> {
        let row = conn
            .query_row(
                "SELECT student_id, event_id, attended, checked_in_at FROM attendance
                 WHERE student_id = ?1 AND event_id = ?2",
                params![student_id, event_id],
                |row| {
                    Ok(AttendanceRow {
                        student_id: row.get(0)?,
                        event_id: row.get(1)?,
                        attended: row.get(2)?,
                        checked_in_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Number of attendance records for a pair (0 or 1).
    pub fn count_for_pair(conn: &Connection, student_id: &str, event_id: &str) -> Result<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM attendance WHERE student_id = ?1 AND event_id = ?2",
            params![student_id, event_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
