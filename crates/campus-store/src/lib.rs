//! # campus-store
//!
//! Campus records store with a `SQLite` backend.
//!
//! - **Entities**: colleges, students and events with caller-chosen IDs
//! - **Facts**: registrations, attendance and feedback keyed by (student, event)
//! - **Reports**: registration counts, attendance percentage, average feedback,
//!   top students and events by type, all skipping cancelled events
//! - **[`CampusStore`]**: pooled, transactional façade over the repositories
//! - **Migrations**: version-tracked SQL schema, embedded at compile time

#![deny(unsafe_code)]

pub mod errors;
pub mod seed;
pub mod sqlite;
pub mod store;
pub mod types;

pub use errors::{Result, StoreError};
pub use seed::SeedSummary;
pub use sqlite::connection::ConnectionConfig;
pub use sqlite::row_types::{
    AttendancePercentageRow, AttendanceRow, AverageFeedbackRow, CollegeRow, EventRow,
    EventSummaryRow, FeedbackRow, RegistrationCountRow, RegistrationRow, StudentRow,
    TopStudentRow,
};
pub use store::{CampusStore, DEFAULT_TOP_STUDENTS, MAX_TOP_STUDENTS, StoreOptions};
pub use types::{EventType, ParseEventTypeError, Rating};
