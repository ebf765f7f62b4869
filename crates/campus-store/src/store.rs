//! High-level `CampusStore` API.
//!
//! Wraps the connection pool and composes repository calls into atomic
//! operations. Every write runs in its own `BEGIN IMMEDIATE` transaction on a
//! pooled connection, so callers never observe partial state and concurrent
//! writers queue on the database lock instead of failing a lock upgrade.

use std::time::Duration;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::{debug, info, instrument};

use crate::errors::{Result, StoreError};
use crate::seed::{self, SeedSummary};
use crate::sqlite::connection::{self, ConnectionConfig, ConnectionPool, PooledConnection};
use crate::sqlite::migrations::run_migrations;
use crate::sqlite::repositories::{
    AttendanceRepo, CollegeRepo, EventRepo, FeedbackRepo, NewEvent, NewStudent, RegistrationRepo,
    ReportRepo, StudentRepo,
};
use crate::sqlite::row_types::{
    AttendancePercentageRow, AttendanceRow, AverageFeedbackRow, CollegeRow, EventRow,
    EventSummaryRow, FeedbackRow, RegistrationCountRow, RegistrationRow, StudentRow,
    TopStudentRow,
};
use crate::types::{EventType, Rating};

/// Default number of rows returned by [`CampusStore::top_students`].
pub const DEFAULT_TOP_STUDENTS: i64 = 3;

/// Largest accepted `limit` for [`CampusStore::top_students`].
pub const MAX_TOP_STUDENTS: i64 = 100;

/// Behavioural switches of the store.
#[derive(Clone, Copy, Debug, Default)]
pub struct StoreOptions {
    /// Reject registrations, attendance and feedback that name an unknown
    /// student or event.
    pub enforce_references: bool,
}

impl From<&ConnectionConfig> for StoreOptions {
    fn from(config: &ConnectionConfig) -> Self {
        Self {
            enforce_references: config.enforce_references,
        }
    }
}

/// Shared handle to the campus database. Cheap to clone.
#[derive(Clone)]
pub struct CampusStore {
    pool: ConnectionPool,
    options: StoreOptions,
}

impl CampusStore {
    const SQLITE_BUSY_MAX_RETRIES: u32 = 8;

    /// Wrap an existing pool. Migrations are the caller's responsibility.
    pub fn new(pool: ConnectionPool, options: StoreOptions) -> Self {
        Self { pool, options }
    }

    /// Open (or create) a database file and bring its schema up to date.
    pub fn open(path: &str, config: &ConnectionConfig) -> Result<Self> {
        let pool = connection::new_file(path, config)?;
        Self::migrated(pool, config)
    }

    /// Fresh in-memory database with the full schema.
    pub fn in_memory(config: &ConnectionConfig) -> Result<Self> {
        let pool = connection::new_in_memory(config)?;
        Self::migrated(pool, config)
    }

    fn migrated(pool: ConnectionPool, config: &ConnectionConfig) -> Result<Self> {
        {
            let conn = pool.get()?;
            let applied = run_migrations(&conn)?;
            debug!(applied, "schema ready");
        }
        Ok(Self::new(pool, StoreOptions::from(config)))
    }

    /// Get a connection from the pool.
    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    /// Whether referential checks are enabled.
    pub fn enforces_references(&self) -> bool {
        self.options.enforce_references
    }

    /// Get the raw connection pool.
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Check that a connection can be served and answers a trivial query.
    pub fn ping(&self) -> Result<()> {
        let conn = self.conn()?;
        let _: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(())
    }

    /// Run `f` inside an immediate transaction, retrying on `SQLITE_BUSY`.
    fn write<T>(&self, mut f: impl FnMut(&Connection) -> Result<T>) -> Result<T> {
        self.retry_on_sqlite_busy(|| {
            let conn = self.conn()?;
            let tx = Transaction::new_unchecked(&conn, TransactionBehavior::Immediate)?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        })
    }

    /// Retry an operation on `SQLite` BUSY/LOCKED with linear backoff.
    #[allow(clippy::unused_self)]
    fn retry_on_sqlite_busy<T>(&self, mut f: impl FnMut() -> Result<T>) -> Result<T> {
        let mut attempts = 0;

        loop {
            match f() {
                Ok(value) => return Ok(value),
                Err(err)
                    if Self::is_sqlite_busy_or_locked(&err)
                        && attempts < Self::SQLITE_BUSY_MAX_RETRIES =>
                {
                    attempts += 1;
                    let backoff_ms = u64::from(attempts).saturating_mul(25).min(250);
                    debug!(attempts, backoff_ms, "database busy, retrying");
                    std::thread::sleep(Duration::from_millis(backoff_ms));
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn is_sqlite_busy_or_locked(err: &StoreError) -> bool {
        match err {
            StoreError::Sqlite(rusqlite::Error::SqliteFailure(code, _)) => matches!(
                code.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }

    fn check_references(&self, conn: &Connection, student_id: &str, event_id: &str) -> Result<()> {
        if !self.options.enforce_references {
            return Ok(());
        }
        if !StudentRepo::exists(conn, student_id)? {
            return Err(StoreError::StudentNotFound(student_id.to_string()));
        }
        if !EventRepo::exists(conn, event_id)? {
            return Err(StoreError::EventNotFound(event_id.to_string()));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Entities
    // ─────────────────────────────────────────────────────────────────────

    /// Create a college.
    #[instrument(skip(self, name))]
    pub fn create_college(&self, id: &str, name: &str) -> Result<CollegeRow> {
        let row = self.write(|conn| CollegeRepo::insert(conn, id, name))?;
        info!(college_id = %row.id, "college created");
        Ok(row)
    }

    /// Create a student. Duplicate IDs fail and leave the existing row alone.
    #[instrument(skip(self, name, email))]
    pub fn create_student(
        &self,
        id: &str,
        name: &str,
        email: &str,
        college_id: &str,
    ) -> Result<StudentRow> {
        let student = NewStudent {
            id,
            name,
            email,
            college_id,
        };
        let row = self.write(|conn| StudentRepo::insert(conn, &student))?;
        info!(student_id = %row.id, "student created");
        Ok(row)
    }

    /// Create an event. New events are not cancelled.
    #[instrument(skip(self, name, event_type), fields(event_type = %event_type))]
    pub fn create_event(
        &self,
        id: &str,
        name: &str,
        event_type: EventType,
        date: &str,
        college_id: &str,
    ) -> Result<EventRow> {
        let event = NewEvent {
            id,
            name,
            event_type,
            date,
            college_id,
        };
        let row = self.write(|conn| EventRepo::insert(conn, &event))?;
        info!(event_id = %row.id, "event created");
        Ok(row)
    }

    /// Flag or unflag an event as cancelled.
    #[instrument(skip(self))]
    pub fn set_event_cancelled(&self, event_id: &str, cancelled: bool) -> Result<()> {
        self.write(|conn| {
            if EventRepo::set_cancelled(conn, event_id, cancelled)? {
                Ok(())
            } else {
                Err(StoreError::EventNotFound(event_id.to_string()))
            }
        })?;
        info!(event_id, cancelled, "event cancellation updated");
        Ok(())
    }

    /// Look up a student.
    pub fn get_student(&self, id: &str) -> Result<StudentRow> {
        let conn = self.conn()?;
        StudentRepo::get(&conn, id)?.ok_or_else(|| StoreError::StudentNotFound(id.to_string()))
    }

    /// Look up an event, cancelled or not.
    pub fn get_event(&self, id: &str) -> Result<EventRow> {
        let conn = self.conn()?;
        EventRepo::get(&conn, id)?.ok_or_else(|| StoreError::EventNotFound(id.to_string()))
    }

    /// Look up a college.
    pub fn get_college(&self, id: &str) -> Result<CollegeRow> {
        let conn = self.conn()?;
        CollegeRepo::get(&conn, id)?.ok_or_else(|| StoreError::CollegeNotFound(id.to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Facts
    // ─────────────────────────────────────────────────────────────────────

    /// Register a student for an event.
    ///
    /// Concurrent duplicate registrations are arbitrated by the primary key:
    /// exactly one succeeds, the rest get [`StoreError::AlreadyRegistered`].
    #[instrument(skip(self))]
    pub fn register_student(&self, student_id: &str, event_id: &str) -> Result<RegistrationRow> {
        let row = self.write(|conn| {
            self.check_references(conn, student_id, event_id)?;
            RegistrationRepo::insert(conn, student_id, event_id)
        })?;
        info!(student_id, event_id, "student registered");
        Ok(row)
    }

    /// Record attendance, replacing any earlier record for the pair.
    #[instrument(skip(self))]
    pub fn mark_attendance(
        &self,
        student_id: &str,
        event_id: &str,
        attended: bool,
    ) -> Result<AttendanceRow> {
        let row = self.write(|conn| {
            self.check_references(conn, student_id, event_id)?;
            AttendanceRepo::upsert(conn, student_id, event_id, attended)
        })?;
        info!(student_id, event_id, attended, "attendance marked");
        Ok(row)
    }

    /// Record feedback, replacing any earlier submission for the pair.
    ///
    /// The rating is validated before anything is written.
    #[instrument(skip(self, comment))]
    pub fn submit_feedback(
        &self,
        student_id: &str,
        event_id: &str,
        rating: i64,
        comment: &str,
    ) -> Result<FeedbackRow> {
        let rating = Rating::new(rating)?;
        let row = self.write(|conn| {
            self.check_references(conn, student_id, event_id)?;
            FeedbackRepo::upsert(conn, student_id, event_id, rating, comment)
        })?;
        info!(student_id, event_id, rating = row.rating, "feedback submitted");
        Ok(row)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reports
    // ─────────────────────────────────────────────────────────────────────

    /// Registrations per non-cancelled event, busiest first.
    pub fn registration_counts(&self) -> Result<Vec<RegistrationCountRow>> {
        let conn = self.conn()?;
        ReportRepo::registration_counts(&conn)
    }

    /// Attendance percentage per non-cancelled event with registrations.
    pub fn attendance_percentage(&self) -> Result<Vec<AttendancePercentageRow>> {
        let conn = self.conn()?;
        ReportRepo::attendance_percentage(&conn)
    }

    /// Average rating per non-cancelled event with feedback.
    pub fn average_feedback(&self) -> Result<Vec<AverageFeedbackRow>> {
        let conn = self.conn()?;
        ReportRepo::average_feedback(&conn)
    }

    /// The `limit` students with the most attended events.
    ///
    /// `limit` must lie in `1..=`[`MAX_TOP_STUDENTS`].
    pub fn top_students(&self, limit: i64) -> Result<Vec<TopStudentRow>> {
        if !(1..=MAX_TOP_STUDENTS).contains(&limit) {
            return Err(StoreError::InvalidRange {
                field: "limit",
                value: limit,
                min: 1,
                max: MAX_TOP_STUDENTS,
            });
        }
        let conn = self.conn()?;
        ReportRepo::top_students(&conn, limit)
    }

    /// Non-cancelled events of one type.
    pub fn events_by_type(&self, event_type: EventType) -> Result<Vec<EventSummaryRow>> {
        let conn = self.conn()?;
        ReportRepo::events_by_type(&conn, event_type)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Demo data
    // ─────────────────────────────────────────────────────────────────────

    /// Load the demo dataset in one transaction. Idempotent.
    #[instrument(skip(self))]
    pub fn seed_demo_data(&self) -> Result<SeedSummary> {
        let summary = self.write(seed::seed_demo_data)?;
        info!(
            colleges = summary.colleges,
            students = summary.students,
            events = summary.events,
            registrations = summary.registrations,
            "demo data seeded"
        );
        Ok(summary)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
