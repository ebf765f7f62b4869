//! Event repository — the `events` table.

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::{Result, StoreError, is_key_conflict};
use crate::sqlite::row_types::EventRow;
use crate::types::EventType;

/// Fields of an event to insert. New events are never cancelled.
#[derive(Clone, Copy, Debug)]
pub struct NewEvent<'a> {
    /// Caller-chosen ID.
    pub id: &'a str,
    /// Display name.
    pub name: &'a str,
    /// Event kind.
    pub event_type: EventType,
    /// Date, stored as given.
    pub date: &'a str,
    /// Advisory college reference.
    pub college_id: &'a str,
}

/// Event repository — stateless, every method takes `&Connection`.
pub struct EventRepo;

impl EventRepo {
    /// Insert an event. Fails with [`StoreError::DuplicateKey`] if the id is
    /// taken.
    pub fn insert(conn: &Connection, event: &NewEvent<'_>) -> Result<EventRow> {
        let _ = conn
            .execute(
                "INSERT INTO events (id, name, type, date, college_id, cancelled)
                 VALUES (?1, ?2, ?3, ?4, ?5, 0)",
                params![
                    event.id,
                    event.name,
                    event.event_type.as_str(),
                    event.date,
                    event.college_id
                ],
            )
            .map_err(|e| {
                if is_key_conflict(&e) {
                    StoreError::DuplicateKey {
                        entity: "event",
                        id: event.id.to_string(),
                    }
                } else {
                    e.into()
                }
            })?;
        Ok(EventRow {
            id: event.id.to_string(),
            name: event.name.to_string(),
            event_type: event.event_type,
            date: event.date.to_string(),
            college_id: event.college_id.to_string(),
            cancelled: false,
        })
    }

    /// Insert unless the id exists. Returns whether a row was inserted.
    pub fn insert_if_absent(conn: &Connection, event: &NewEvent<'_>) -> Result<bool> {
        let changed = conn.execute(
            "INSERT INTO events (id, name, type, date, college_id, cancelled)
             VALUES (?1, ?2, ?3, ?4, ?5, 0)
             ON CONFLICT(id) DO NOTHING",
            params![
                event.id,
                event.name,
                event.event_type.as_str(),
                event.date,
                event.college_id
            ],
        )?;
        Ok(changed > 0)
    }

    /// Get an event by ID, cancelled or not.
    pub fn get(conn: &Connection, id: &str) -> Result<Option<EventRow>> {
        let row = conn
            .query_row(
                "SELECT id, name, type, date, college_id, cancelled FROM events WHERE id = ?1",
                params![id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Whether an event with this ID exists.
    pub fn exists(conn: &Connection, id: &str) -> Result<bool> {
        let found = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM events WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    /// Set or clear the cancelled flag. Returns whether the event exists.
    pub fn set_cancelled(conn: &Connection, id: &str, cancelled: bool) -> Result<bool> {
        let changed = conn.execute(
            "UPDATE events SET cancelled = ?1 WHERE id = ?2",
            params![cancelled, id],
        )?;
        Ok(changed > 0)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRow> {
        let raw_type: String = row.get(2)?;
        let event_type = raw_type
            .parse::<EventType>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
        Ok(EventRow {
            id: row.get(0)?,
            name: row.get(1)?,
            event_type,
            date: row.get(3)?,
            college_id: row.get(4)?,
            cancelled: row.get(5)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::sqlite::repositories::test_support::setup;

    fn workshop() -> NewEvent<'static> {
        NewEvent {
            id: "COL01_EV001",
            name: "AI Workshop",
            event_type: EventType::Workshop,
            date: "2025-09-10",
            college_id: "COL01",
        }
    }

    #[test]
    fn insert_and_get() {
        let conn = setup();
        let inserted = EventRepo::insert(&conn, &workshop()).unwrap();
        let fetched = EventRepo::get(&conn, "COL01_EV001").unwrap().unwrap();
        assert_eq!(inserted, fetched);
        assert_eq!(fetched.event_type, EventType::Workshop);
        assert!(!fetched.cancelled);
    }

    #[test]
    fn duplicate_id_fails() {
        let conn = setup();
        let _ = EventRepo::insert(&conn, &workshop()).unwrap();
        assert_matches!(
            EventRepo::insert(&conn, &workshop()),
            Err(StoreError::DuplicateKey { entity: "event", .. })
        );
    }

    #[test]
    fn cancelled_event_still_readable() {
        let conn = setup();
        let _ = EventRepo::insert(&conn, &workshop()).unwrap();
        assert!(EventRepo::set_cancelled(&conn, "COL01_EV001", true).unwrap());
        let fetched = EventRepo::get(&conn, "COL01_EV001").unwrap().unwrap();
        assert!(fetched.cancelled);

        assert!(EventRepo::set_cancelled(&conn, "COL01_EV001", false).unwrap());
        assert!(!EventRepo::get(&conn, "COL01_EV001").unwrap().unwrap().cancelled);
    }

    #[test]
    fn set_cancelled_on_missing_event() {
        let conn = setup();
        assert!(!EventRepo::set_cancelled(&conn, "ghost", true).unwrap());
    }

    #[test]
    fn exists_tracks_inserts() {
        let conn = setup();
        assert!(!EventRepo::exists(&conn, "COL01_EV001").unwrap());
        assert!(EventRepo::insert_if_absent(&conn, &workshop()).unwrap());
        assert!(EventRepo::exists(&conn, "COL01_EV001").unwrap());
        assert!(!EventRepo::insert_if_absent(&conn, &workshop()).unwrap());
    }
}
