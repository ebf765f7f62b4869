//! Demo dataset used by `GET /seed`.
//!
//! Entities and registrations are insert-if-absent; attendance and feedback
//! go through the regular upserts. Running the seed any number of times
//! leaves the same rows behind.

use rusqlite::Connection;
use tracing::debug;

use crate::errors::Result;
use crate::sqlite::repositories::{
    AttendanceRepo, CollegeRepo, EventRepo, FeedbackRepo, NewEvent, NewStudent, RegistrationRepo,
    StudentRepo,
};
use crate::types::{EventType, Rating};

const COLLEGE: (&str, &str) = ("COL01", "Tech College");

const STUDENTS: [NewStudent<'static>; 2] = [
    NewStudent {
        id: "COL01_STU001",
        name: "Alice",
        email: "alice@edu.com",
        college_id: "COL01",
    },
    NewStudent {
        id: "COL01_STU002",
        name: "Bob",
        email: "bob@edu.com",
        college_id: "COL01",
    },
];

const EVENTS: [NewEvent<'static>; 2] = [
    NewEvent {
        id: "COL01_EV001",
        name: "AI Workshop",
        event_type: EventType::Workshop,
        date: "2025-09-10",
        college_id: "COL01",
    },
    NewEvent {
        id: "COL01_EV002",
        name: "Hackathon",
        event_type: EventType::Hackathon,
        date: "2025-09-15",
        college_id: "COL01",
    },
];

const REGISTRATIONS: [(&str, &str); 3] = [
    ("COL01_STU001", "COL01_EV001"),
    ("COL01_STU002", "COL01_EV001"),
    ("COL01_STU001", "COL01_EV002"),
];

const ATTENDANCE: [(&str, &str, bool); 3] = [
    ("COL01_STU001", "COL01_EV001", true),
    ("COL01_STU002", "COL01_EV001", false),
    ("COL01_STU001", "COL01_EV002", true),
];

const FEEDBACK: [(&str, &str, i64); 2] = [
    ("COL01_STU001", "COL01_EV001", 5),
    ("COL01_STU001", "COL01_EV002", 4),
];

/// How many rows a seed run newly inserted. Upserted facts are not counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Colleges inserted.
    pub colleges: usize,
    /// Students inserted.
    pub students: usize,
    /// Events inserted.
    pub events: usize,
    /// Registrations inserted.
    pub registrations: usize,
}

/// Write the demo dataset. The caller owns the surrounding transaction.
pub fn seed_demo_data(conn: &Connection) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    if CollegeRepo::insert_if_absent(conn, COLLEGE.0, COLLEGE.1)? {
        summary.colleges += 1;
    }
    for student in &STUDENTS {
        if StudentRepo::insert_if_absent(conn, student)? {
            summary.students += 1;
        }
    }
    for event in &EVENTS {
        if EventRepo::insert_if_absent(conn, event)? {
            summary.events += 1;
        }
    }
    for (student_id, event_id) in REGISTRATIONS {
        if RegistrationRepo::insert_if_absent(conn, student_id, event_id)? {
            summary.registrations += 1;
        }
    }
    for (student_id, event_id, attended) in ATTENDANCE {
        let _ = AttendanceRepo::upsert(conn, student_id, event_id, attended)?;
    }
    for (student_id, event_id, rating) in FEEDBACK {
        let _ = FeedbackRepo::upsert(conn, student_id, event_id, Rating::new(rating)?, "")?;
    }

    debug!(?summary, "demo data seeded");
    Ok(summary)
}
