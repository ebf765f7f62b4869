//! Row types returned by the repositories.
//!
//! Entity and fact rows mirror their tables. Report rows serialize the
//! event/student identifier as `id`, matching the report wire format.

use serde::{Deserialize, Serialize};

use crate::types::EventType;

/// Row of the `colleges` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollegeRow {
    /// College ID.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Row of the `students` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRow {
    /// Student ID.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Advisory college reference.
    pub college_id: String,
}

/// Row of the `events` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRow {
    /// Event ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Event kind.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Date as supplied by the caller.
    pub date: String,
    /// Advisory college reference.
    pub college_id: String,
    /// Cancelled events are excluded from every report.
    pub cancelled: bool,
}

/// Row of the `registrations` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRow {
    /// Registered student.
    pub student_id: String,
    /// Event registered for.
    pub event_id: String,
    /// RFC 3339 timestamp assigned by the store.
    pub registered_on: String,
}

/// Row of the `attendance` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRow {
    /// Student.
    pub student_id: String,
    /// Event.
    pub event_id: String,
    /// Whether the student attended.
    pub attended: bool,
    /// RFC 3339 timestamp of the latest check-in write.
    pub checked_in_at: String,
}

/// Row of the `feedback` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRow {
    /// Student.
    pub student_id: String,
    /// Event.
    pub event_id: String,
    /// Rating in `1..=5`.
    pub rating: u8,
    /// Free-text comment, empty when none was given.
    pub comment: String,
    /// RFC 3339 timestamp of the latest submission.
    pub submitted_at: String,
}

/// `registration_counts` report row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegistrationCountRow {
    /// Event ID.
    #[serde(rename = "id")]
    pub event_id: String,
    /// Event name.
    pub name: String,
    /// Number of registered students.
    pub total_registrations: i64,
}

/// `attendance_percentage` report row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttendancePercentageRow {
    /// Event ID.
    #[serde(rename = "id")]
    pub event_id: String,
    /// Event name.
    pub name: String,
    /// Percentage of registrations with a positive attendance record,
    /// rounded to two decimals.
    pub attendance_percentage: f64,
}

/// `average_feedback` report row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AverageFeedbackRow {
    /// Event ID.
    #[serde(rename = "id")]
    pub event_id: String,
    /// Event name.
    pub name: String,
    /// Mean rating rounded to two decimals.
    pub avg_feedback: f64,
}

/// `top_students` report row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopStudentRow {
    /// Student ID.
    #[serde(rename = "id")]
    pub student_id: String,
    /// Student name.
    pub name: String,
    /// Events attended (non-cancelled only).
    pub events_attended: i64,
}

/// `events_by_type` report row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummaryRow {
    /// Event ID.
    #[serde(rename = "id")]
    pub event_id: String,
    /// Event name.
    pub name: String,
    /// Event date.
    pub date: String,
}
