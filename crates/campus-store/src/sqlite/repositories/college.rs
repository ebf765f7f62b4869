//! College repository — the `colleges` table.

use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::{Result, StoreError, is_key_conflict};
use crate::sqlite::row_types::CollegeRow;

/// College repository — stateless, every method takes `&Connection`.
pub struct CollegeRepo;

impl CollegeRepo {
    /// Insert a college. Fails with [`StoreError::DuplicateKey`] if the id
    /// is taken.
    pub fn insert(conn: &Connection, id: &str, name: &str) -> Result<CollegeRow> {
        let _ = conn
            .execute(
                "INSERT INTO colleges (id, name) VALUES (?1, ?2)",
                params![id, name],
            )
            .map_err(|e| {
                if is_key_conflict(&e) {
                    StoreError::DuplicateKey {
                        entity: "college",
                        id: id.to_string(),
                    }
                } else {
                    e.into()
                }
            })?;
        Ok(CollegeRow {
            id: id.to_string(),
            name: name.to_string(),
        })
    }

    /// Insert unless the id exists. Returns whether a row was inserted.
    pub fn insert_if_absent(conn: &Connection, id: &str, name: &str) -> Result<bool> {
        let changed = conn.execute(
            "INSERT INTO colleges (id, name) VALUES (?1, ?2) ON CONFLICT(id) DO NOTHING",
            params![id, name],
        )?;
        Ok(changed > 0)
    }

    /// Get a college by ID.
    pub fn get(conn: &Connection, id: &str) -> Result<Option<CollegeRow>> {
        let row = conn
            .query_row(
                "SELECT id, name FROM colleges WHERE id = ?1",
                params![id],
                |row| {
                    Ok(CollegeRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::sqlite::repositories::test_support::setup;

    #[test]
    fn insert_and_get() {
        let conn = setup();
        let _ = CollegeRepo::insert(&conn, "COL01", "Tech College").unwrap();
        let row = CollegeRepo::get(&conn, "COL01").unwrap().unwrap();
        assert_eq!(row.name, "Tech College");
    }

    #[test]
    fn duplicate_insert_fails() {
        let conn = setup();
        let _ = CollegeRepo::insert(&conn, "COL01", "Tech College").unwrap();
        assert_matches!(
            CollegeRepo::insert(&conn, "COL01", "Other"),
            Err(StoreError::DuplicateKey { entity: "college", .. })
        );
        assert_eq!(CollegeRepo::get(&conn, "COL01").unwrap().unwrap().name, "Tech College");
    }

    #[test]
    fn insert_if_absent_reports_insertion() {
        let conn = setup();
        assert!(CollegeRepo::insert_if_absent(&conn, "COL01", "Tech College").unwrap());
        assert!(!CollegeRepo::insert_if_absent(&conn, "COL01", "Renamed").unwrap());
        assert_eq!(CollegeRepo::get(&conn, "COL01").unwrap().unwrap().name, "Tech College");
    }

    #[test]
    fn get_missing_is_none() {
        let conn = setup();
        assert!(CollegeRepo::get(&conn, "nope").unwrap().is_none());
    }
}
