//! Student repository — the `students` table.

use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::{Result, StoreError, is_key_conflict};
use crate::sqlite::row_types::StudentRow;

/// Fields of a student to insert.
#[derive(Clone, Copy, Debug)]
pub struct NewStudent<'a> {
    /// Caller-chosen ID.
    pub id: &'a str,
    /// Full name.
    pub name: &'a str,
    /// Contact email.
    pub email: &'a str,
    /// Advisory college reference.
    pub college_id: &'a str,
}

/// Student repository — stateless, every method takes `&Connection`.
pub struct StudentRepo;

impl StudentRepo {
    /// Insert a student. Fails with [`StoreError::DuplicateKey`] if the id
    /// is taken; the existing row is left untouched.
    pub fn insert(conn: &Connection, student: &NewStudent<'_>) -> Result<StudentRow> {
        let _ = conn
            .execute(
                "INSERT INTO students (id, name, email, college_id) VALUES (?1, ?2, ?3, ?4)",
                params![student.id, student.name, student.email, student.college_id],
            )
            .map_err(|e| {
                if is_key_conflict(&e) {
                    StoreError::DuplicateKey {
                        entity: "student",
                        id: student.id.to_string(),
                    }
                } else {
                    e.into()
                }
            })?;
        Ok(StudentRow {
            id: student.id.to_string(),
            name: student.name.to_string(),
            email: student.email.to_string(),
            college_id: student.college_id.to_string(),
        })
    }

    /// Insert unless the id exists. Returns whether a row was inserted.
    pub fn insert_if_absent(conn: &Connection, student: &NewStudent<'_>) -> Result<bool> {
        let changed = conn.execute(
            "INSERT INTO students (id, name, email, college_id) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO NOTHING",
            params![student.id, student.name, student.email, student.college_id],
        )?;
        Ok(changed > 0)
    }

    /// Get a student by ID.
    pub fn get(conn: &Connection, id: &str) -> Result<Option<StudentRow>> {
        let row = conn
            .query_row(
                "SELECT id, name, email, college_id FROM students WHERE id = ?1",
                params![id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Whether a student with this ID exists.
    pub fn exists(conn: &Connection, id: &str) -> Result<bool> {
        let found = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM students WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StudentRow> {
        Ok(StudentRow {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            college_id: row.get(3)?,
        })
    }
}
