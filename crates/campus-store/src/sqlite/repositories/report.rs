//! Report queries. Every report is computed fresh from the fact tables and
//! skips cancelled events.

use rusqlite::{Connection, params};

use crate::errors::Result;
use crate::sqlite::row_types::{
    AttendancePercentageRow, AverageFeedbackRow, EventSummaryRow, RegistrationCountRow,
    TopStudentRow,
};
use crate::types::EventType;

/// Report repository — stateless, every method takes `&Connection`.
pub struct ReportRepo;

impl ReportRepo {
    /// Registrations per non-cancelled event, zero included. Busiest first.
    pub fn registration_counts(conn: &Connection) -> Result<Vec<RegistrationCountRow>> {
        let mut stmt = conn.prepare(
            "SELECT e.id, e.name, COUNT(r.student_id) AS total_registrations
             FROM events e
             LEFT JOIN registrations r ON r.event_id = e.id
             WHERE e.cancelled = 0
             GROUP BY e.id, e.name
             ORDER BY total_registrations DESC, e.id ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(RegistrationCountRow {
                    event_id: row.get(0)?,
                    name: row.get(1)?,
                    total_registrations: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Share of registered students marked as attended, per non-cancelled
    /// event with at least one registration.
    ///
    /// Attendance rows for students who never registered do not count.
    pub fn attendance_percentage(conn: &Connection) -> Result<Vec<AttendancePercentageRow>> {
        let mut stmt = conn.prepare(
            "SELECT e.id, e.name,
                    COALESCE(ROUND(
                        100.0 * SUM(CASE WHEN a.attended = 1 THEN 1 ELSE 0 END)
                              / COUNT(r.student_id), 2), 0.0) AS attendance_percentage
             FROM events e
             JOIN registrations r ON r.event_id = e.id
             LEFT JOIN attendance a
                    ON a.event_id = r.event_id AND a.student_id = r.student_id
             WHERE e.cancelled = 0
             GROUP BY e.id, e.name
             ORDER BY e.id ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(AttendancePercentageRow {
                    event_id: row.get(0)?,
                    name: row.get(1)?,
                    attendance_percentage: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Mean rating per non-cancelled event with at least one feedback.
    pub fn average_feedback(conn: &Connection) -> Result<Vec<AverageFeedbackRow>> {
        let mut stmt = conn.prepare(
            "SELECT e.id, e.name, ROUND(AVG(f.rating), 2) AS avg_feedback
             FROM events e
             JOIN feedback f ON f.event_id = e.id
             WHERE e.cancelled = 0
             GROUP BY e.id, e.name
             ORDER BY e.id ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(AverageFeedbackRow {
                    event_id: row.get(0)?,
                    name: row.get(1)?,
                    avg_feedback: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Students ranked by events attended. `limit` is not validated here.
    ///
    /// Attendance on an event id with no `events` row still counts; only
    /// cancelled events are excluded.
    pub fn top_students(conn: &Connection, limit: i64) -> Result<Vec<TopStudentRow>> {
        let mut stmt = conn.prepare(
            "SELECT s.id, s.name, COUNT(*) AS events_attended
             FROM students s
             JOIN attendance a ON a.student_id = s.id
             LEFT JOIN events e ON e.id = a.event_id
             WHERE a.attended = 1 AND COALESCE(e.cancelled, 0) = 0
             GROUP BY s.id, s.name
             ORDER BY events_attended DESC, s.id ASC
             LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(TopStudentRow {
                    student_id: row.get(0)?,
                    name: row.get(1)?,
                    events_attended: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Non-cancelled events of one type, by date then id.
    pub fn events_by_type(conn: &Connection, event_type: EventType) -> Result<Vec<EventSummaryRow>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, date FROM events
             WHERE type = ?1 AND cancelled = 0
             ORDER BY date ASC, id ASC",
        )?;
        let rows = stmt
            .query_map(params![event_type.as_str()], |row| {
                Ok(EventSummaryRow {
                    event_id: row.get(0)?,
                    name: row.get(1)?,
                    date: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::repositories::test_support::setup;
    use crate::sqlite::repositories::{
        AttendanceRepo, EventRepo, FeedbackRepo, NewEvent, NewStudent, RegistrationRepo,
        StudentRepo,
    };
    use crate::types::Rating;

    fn event(conn: &Connection, id: &str, event_type: EventType, date: &str) {
        let _ = EventRepo::insert(
            conn,
            &NewEvent {
                id,
                name: id,
                event_type,
                date,
                college_id: "C1",
            },
        )
        .unwrap();
    }

    fn student(conn: &Connection, id: &str) {
        let _ = StudentRepo::insert(
            conn,
            &NewStudent {
                id,
                name: id,
                email: "x@edu.com",
                college_id: "C1",
            },
        )
        .unwrap();
    }

    #[test]
    fn registration_counts_sorted_and_zero_filled() {
        let conn = setup();
        event(&conn, "E1", EventType::Workshop, "2025-01-01");
        event(&conn, "E2", EventType::Fest, "2025-01-02");
        event(&conn, "E3", EventType::Seminar, "2025-01-03");
        let _ = RegistrationRepo::insert(&conn, "S1", "E2").unwrap();
        let _ = RegistrationRepo::insert(&conn, "S2", "E2").unwrap();
        let _ = RegistrationRepo::insert(&conn, "S1", "E3").unwrap();

        let rows = ReportRepo::registration_counts(&conn).unwrap();
        let summary: Vec<(&str, i64)> = rows
            .iter()
            .map(|r| (r.event_id.as_str(), r.total_registrations))
            .collect();
        assert_eq!(summary, vec![("E2", 2), ("E3", 1), ("E1", 0)]);
    }

    #[test]
    fn registration_counts_skip_cancelled() {
        let conn = setup();
        event(&conn, "E1", EventType::Workshop, "2025-01-01");
        event(&conn, "E2", EventType::Workshop, "2025-01-02");
        let _ = RegistrationRepo::insert(&conn, "S1", "E1").unwrap();
        let _ = EventRepo::set_cancelled(&conn, "E1", true).unwrap();

        let rows = ReportRepo::registration_counts(&conn).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event_id, "E2");
    }

    #[test]
    fn attendance_percentage_half() {
        let conn = setup();
        event(&conn, "E1", EventType::Workshop, "2025-01-01");
        let _ = RegistrationRepo::insert(&conn, "S1", "E1").unwrap();
        let _ = RegistrationRepo::insert(&conn, "S2", "E1").unwrap();
        let _ = AttendanceRepo::upsert(&conn, "S1", "E1", true).unwrap();
        let _ = AttendanceRepo::upsert(&conn, "S2", "E1", false).unwrap();

        let rows = ReportRepo::attendance_percentage(&conn).unwrap();
        assert_eq!(rows.len(), 1);
        assert!((rows[0].attendance_percentage - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn attendance_percentage_rounds_and_ignores_unregistered() {
        let conn = setup();
        event(&conn, "E1", EventType::Workshop, "2025-01-01");
        event(&conn, "E2", EventType::Workshop, "2025-01-02");
        for s in ["S1", "S2", "S3"] {
            let _ = RegistrationRepo::insert(&conn, s, "E1").unwrap();
        }
        let _ = AttendanceRepo::upsert(&conn, "S1", "E1", true).unwrap();
        // Not registered: must not count.
        let _ = AttendanceRepo::upsert(&conn, "S9", "E1", true).unwrap();

        let rows = ReportRepo::attendance_percentage(&conn).unwrap();
        assert_eq!(rows.len(), 1, "events without registrations are omitted");
        assert!((rows[0].attendance_percentage - 33.33).abs() < 1e-9);
    }

    #[test]
    fn attendance_percentage_zero_without_attendance_rows() {
        let conn = setup();
        event(&conn, "E1", EventType::Workshop, "2025-01-01");
        let _ = RegistrationRepo::insert(&conn, "S1", "E1").unwrap();

        let rows = ReportRepo::attendance_percentage(&conn).unwrap();
        assert!(rows[0].attendance_percentage.abs() < f64::EPSILON);
    }

    #[test]
    fn average_feedback_rounded() {
        let conn = setup();
        event(&conn, "E1", EventType::Workshop, "2025-01-01");
        event(&conn, "E2", EventType::Workshop, "2025-01-02");
        for (s, r) in [("S1", 5), ("S2", 4), ("S3", 4)] {
            let _ = FeedbackRepo::upsert(&conn, s, "E1", Rating::new(r).unwrap(), "").unwrap();
        }

        let rows = ReportRepo::average_feedback(&conn).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event_id, "E1");
        assert!((rows[0].avg_feedback - 4.33).abs() < 1e-9);
    }

    #[test]
    fn top_students_ordering_and_limit() {
        let conn = setup();
        for s in ["S1", "S2", "S3"] {
            student(&conn, s);
        }
        event(&conn, "E1", EventType::Workshop, "2025-01-01");
        event(&conn, "E2", EventType::Hackathon, "2025-01-02");
        event(&conn, "E3", EventType::Fest, "2025-01-03");
        let _ = AttendanceRepo::upsert(&conn, "S3", "E1", true).unwrap();
        let _ = AttendanceRepo::upsert(&conn, "S3", "E2", true).unwrap();
        let _ = AttendanceRepo::upsert(&conn, "S1", "E1", true).unwrap();
        let _ = AttendanceRepo::upsert(&conn, "S2", "E2", true).unwrap();
        let _ = AttendanceRepo::upsert(&conn, "S2", "E3", false).unwrap();

        let rows = ReportRepo::top_students(&conn, 10).unwrap();
        let ranked: Vec<(&str, i64)> = rows
            .iter()
            .map(|r| (r.student_id.as_str(), r.events_attended))
            .collect();
        assert_eq!(ranked, vec![("S3", 2), ("S1", 1), ("S2", 1)]);

        assert_eq!(ReportRepo::top_students(&conn, 1).unwrap().len(), 1);
    }

    #[test]
    fn top_students_skip_cancelled_events() {
        let conn = setup();
        student(&conn, "S1");
        event(&conn, "E1", EventType::Workshop, "2025-01-01");
        let _ = AttendanceRepo::upsert(&conn, "S1", "E1", true).unwrap();
        let _ = EventRepo::set_cancelled(&conn, "E1", true).unwrap();

        assert!(ReportRepo::top_students(&conn, 3).unwrap().is_empty());
    }

    #[test]
    fn top_students_count_unknown_events() {
        let conn = setup();
        student(&conn, "S1");
        event(&conn, "E1", EventType::Workshop, "2025-01-01");
        let _ = AttendanceRepo::upsert(&conn, "S1", "NO_SUCH_EVENT", true).unwrap();
        let _ = AttendanceRepo::upsert(&conn, "S1", "E1", true).unwrap();
        let _ = AttendanceRepo::upsert(&conn, "GHOST", "E1", true).unwrap();

        let rows = ReportRepo::top_students(&conn, 3).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].student_id, "S1");
        assert_eq!(rows[0].events_attended, 2);
    }

    #[test]
    fn events_by_type_filters_and_orders() {
        let conn = setup();
        event(&conn, "E3", EventType::Workshop, "2025-03-01");
        event(&conn, "E2", EventType::Workshop, "2025-01-01");
        event(&conn, "E1", EventType::Workshop, "2025-01-01");
        event(&conn, "E4", EventType::Hackathon, "2025-01-01");
        event(&conn, "E5", EventType::Workshop, "2024-01-01");
        let _ = EventRepo::set_cancelled(&conn, "E5", true).unwrap();

        let rows = ReportRepo::events_by_type(&conn, EventType::Workshop).unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.event_id.as_str()).collect();
        assert_eq!(ids, vec!["E1", "E2", "E3"]);

        assert!(ReportRepo::events_by_type(&conn, EventType::Seminar).unwrap().is_empty());
    }
}
