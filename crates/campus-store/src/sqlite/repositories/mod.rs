//! Stateless repositories, one per table, plus the report queries.

pub mod attendance;
pub mod college;
pub mod event;
pub mod feedback;
pub mod registration;
pub mod report;
pub mod student;

pub use attendance::AttendanceRepo;
pub use college::CollegeRepo;
pub use event::{EventRepo, NewEvent};
pub use feedback::FeedbackRepo;
pub use registration::RegistrationRepo;
pub use report::ReportRepo;
pub use student::{NewStudent, StudentRepo};

/// Current time as an RFC 3339 UTC timestamp.
pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}
