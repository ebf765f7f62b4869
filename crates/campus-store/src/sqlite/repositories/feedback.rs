//! Feedback repository — the `feedback` table.

use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::Result;
use crate::sqlite::repositories::now;
use crate::sqlite::row_types::FeedbackRow;
use crate::types::Rating;

/// Feedback repository — stateless, every method takes `&Connection`.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Record feedback for a pair, replacing any earlier submission.
    pub fn upsert(
        conn: &Connection,
        student_id: &str,
        event_id: &str,
        rating: Rating,
        comment: &str,
    ) -> Result<FeedbackRow> {
        let submitted_at = now();
        let _ = conn.execute(
            "INSERT INTO feedback (student_id, event_id, rating, comment, submitted_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(student_id, event_id) DO UPDATE
             SET rating = excluded.rating,
                 comment = excluded.comment,
                 submitted_at = excluded.submitted_at",
            params![student_id, event_id, rating.get(), comment, submitted_at],
        )?;
        Ok(FeedbackRow {
            student_id: student_id.to_string(),
            event_id: event_id.to_string(),
            rating: rating.get(),
            comment: comment.to_string(),
            submitted_at,
        })
    }

    /// Get the feedback for a pair.
    pub fn get(conn: &Connection, student_id: &str, event_id: &str) -> Result<Option<FeedbackRow>> {
        let row = conn
            .query_row(
                "SELECT student_id, event_id, rating, comment, submitted_at FROM feedback
                 WHERE student_id = ?1 AND event_id = ?2",
                params![student_id, event_id],
                |row| {
                    Ok(FeedbackRow {
                        student_id: row.get(0)?,
                        event_id: row.get(1)?,
                        rating: row.get(2)?,
                        comment: row.get(3)?,
                        submitted_at: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::repositories::test_support::setup;

    #[test]
    fn resubmission_replaces() {
        let conn = setup();
        let _ = FeedbackRepo::upsert(&conn, "S1", "E1", Rating::new(2).unwrap(), "meh").unwrap();
        let second =
            FeedbackRepo::upsert(&conn, "S1", "E1", Rating::new(5).unwrap(), "").unwrap();

        let stored = FeedbackRepo::get(&conn, "S1", "E1").unwrap().unwrap();
        assert_eq!(stored.rating, 5);
        assert_eq!(stored.comment, "");
        assert_eq!(stored.submitted_at, second.submitted_at);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM feedback", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn missing_feedback_is_none() {
        let conn = setup();
        assert!(FeedbackRepo::get(&conn, "S1", "E1").unwrap().is_none());
    }
}
