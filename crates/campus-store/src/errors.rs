//! Error types for the campus records store.
//!
//! [`StoreError`] is returned by every store operation. The domain variants
//! (duplicate keys, duplicate registrations, bad enum values, out-of-range
//! numbers, missing parameters, unknown references) are caller errors; the
//! infrastructure variants (`Sqlite`, `Pool`, `Migration`) are not.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An entity with the same primary key already exists.
    #[error("{entity} already exists: {id}")]
    DuplicateKey {
        /// Entity kind (`"student"`, `"event"`, `"college"`).
        entity: &'static str,
        /// The colliding identifier.
        id: String,
    },

    /// The (student, event) registration pair already exists.
    #[error("student {student_id} is already registered for event {event_id}")]
    AlreadyRegistered {
        /// Student of the rejected registration.
        student_id: String,
        /// Event of the rejected registration.
        event_id: String,
    },

    /// A value outside a closed enumeration.
    #[error("invalid {field} {value:?}, expected one of: {expected}")]
    InvalidEnum {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: String,
        /// Accepted values, comma separated.
        expected: &'static str,
    },

    /// A number outside its allowed closed range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    InvalidRange {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },

    /// A required parameter was absent or empty.
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// Requested student was not found.
    #[error("student not found: {0}")]
    StudentNotFound(String),

    /// Requested event was not found.
    #[error("event not found: {0}")]
    EventNotFound(String),

    /// Requested college was not found.
    #[error("college not found: {0}")]
    CollegeNotFound(String),

    /// `SQLite` database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Schema migration failed.
    #[error("migration error: {message}")]
    Migration {
        /// Describes which migration failed and why.
        message: String,
    },
}

impl StoreError {
    /// Whether the error was caused by the caller's input rather than by the
    /// storage layer.
    pub fn is_caller_error(&self) -> bool {
        !matches!(
            self,
            Self::Sqlite(_) | Self::Pool(_) | Self::Migration { .. }
        )
    }
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Extended result code of a constraint violation, if `err` is one.
pub(crate) fn constraint_violation(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Some(e.extended_code)
        }
        _ => None,
    }
}

/// Whether `err` is a primary-key (or unique) constraint violation.
pub(crate) fn is_key_conflict(err: &rusqlite::Error) -> bool {
    matches!(
        constraint_violation(err),
        Some(rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_display() {
        let err = StoreError::DuplicateKey {
            entity: "student",
            id: "COL01_STU001".into(),
        };
        assert_eq!(err.to_string(), "student already exists: COL01_STU001");
    }

    #[test]
    fn invalid_range_display() {
        let err = StoreError::InvalidRange {
            field: "rating",
            value: 6,
            min: 1,
            max: 5,
        };
        assert_eq!(err.to_string(), "rating must be between 1 and 5, got 6");
    }

    #[test]
    fn invalid_enum_display() {
        let err = StoreError::InvalidEnum {
            field: "type",
            value: "Party".into(),
            expected: "Workshop, Hackathon",
        };
        assert_eq!(
            err.to_string(),
            r#"invalid type "Party", expected one of: Workshop, Hackathon"#
        );
    }

    #[test]
    fn missing_parameter_display() {
        let err = StoreError::MissingParameter("type");
        assert_eq!(err.to_string(), "missing required parameter: type");
    }

    #[test]
    fn caller_errors_are_classified() {
        assert!(StoreError::MissingParameter("type").is_caller_error());
        assert!(StoreError::EventNotFound("x".into()).is_caller_error());
        assert!(!StoreError::Sqlite(rusqlite::Error::QueryReturnedNoRows).is_caller_error());
        assert!(!StoreError::Migration { message: "boom".into() }.is_caller_error());
    }

    #[test]
    fn constraint_violation_detected() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id TEXT PRIMARY KEY); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err = conn.execute("INSERT INTO t VALUES ('a')", []).unwrap_err();
        assert!(is_key_conflict(&err));
        assert!(!is_key_conflict(&rusqlite::Error::QueryReturnedNoRows));
    }

    #[test]
    fn from_rusqlite_error() {
        let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StoreError::Sqlite(_)));
    }
}
