//! Registrations, attendance and feedback.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use super::run_store;
use crate::errors::ApiError;
use crate::server::AppState;

/// `POST /register` body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Student to register.
    pub student_id: String,
    /// Event to register for.
    pub event_id: String,
}

/// Attendance flag as clients send it: a boolean, an integer, or one of the
/// strings `"0"`, `"1"`, `"true"`, `"false"`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AttendedFlag {
    /// `true` / `false`.
    Bool(bool),
    /// Non-zero means attended.
    Int(i64),
    /// Textual form.
    Text(String),
}

impl AttendedFlag {
    /// Normalize to a boolean.
    pub fn to_bool(&self) -> Result<bool, ApiError> {
        match self {
            Self::Bool(b) => Ok(*b),
            Self::Int(n) => Ok(*n != 0),
            Self::Text(s) => match s.as_str() {
                "1" | "true" => Ok(true),
                "0" | "false" => Ok(false),
                other => Err(ApiError::BadRequest(format!(
                    "invalid attended {other:?}, expected a boolean or 0/1"
                ))),
            },
        }
    }
}

/// `POST /attendance` body. A missing `attended` means present.
#[derive(Debug, Deserialize)]
pub struct AttendanceRequest {
    /// Student.
    pub student_id: String,
    /// Event.
    pub event_id: String,
    /// Attendance flag.
    #[serde(default)]
    pub attended: Option<AttendedFlag>,
}

/// `POST /feedback` body.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    /// Student.
    pub student_id: String,
    /// Event.
    pub event_id: String,
    /// Rating, checked against `1..=5` by the store.
    pub rating: i64,
    /// Optional comment.
    #[serde(default)]
    pub comment: Option<String>,
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(body) = payload?;
    let _ = run_store(&state, move |store| {
        store.register_student(&body.student_id, &body.event_id)
    })
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Registration successful" })),
    ))
}

/// POST /attendance
pub async fn mark_attendance(
    State(state): State<AppState>,
    payload: Result<Json<AttendanceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(body) = payload?;
    let attended = match &body.attended {
        Some(flag) => flag.to_bool()?,
        None => true,
    };
    let _ = run_store(&state, move |store| {
        store.mark_attendance(&body.student_id, &body.event_id, attended)
    })
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Attendance marked" })),
    ))
}

/// POST /feedback
pub async fn submit_feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(body) = payload?;
    let _ = run_store(&state, move |store| {
        store.submit_feedback(
            &body.student_id,
            &body.event_id,
            body.rating,
            body.comment.as_deref().unwrap_or(""),
        )
    })
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Feedback submitted" })),
    ))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn parse(json: &str) -> AttendanceRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn attended_accepts_booleans_and_integers() {
        let cases = [
            (r#"{"student_id":"S","event_id":"E","attended":true}"#, true),
            (r#"{"student_id":"S","event_id":"E","attended":false}"#, false),
            (r#"{"student_id":"S","event_id":"E","attended":1}"#, true),
            (r#"{"student_id":"S","event_id":"E","attended":0}"#, false),
            (r#"{"student_id":"S","event_id":"E","attended":7}"#, true),
            (r#"{"student_id":"S","event_id":"E","attended":"1"}"#, true),
            (r#"{"student_id":"S","event_id":"E","attended":"false"}"#, false),
        ];
        for (json, expected) in cases {
            let req = parse(json);
            assert_eq!(req.attended.unwrap().to_bool().unwrap(), expected, "{json}");
        }
    }

    #[test]
    fn attended_defaults_to_absent() {
        let req = parse(r#"{"student_id":"S","event_id":"E"}"#);
        assert!(req.attended.is_none());
    }

    #[test]
    fn attended_rejects_other_strings() {
        let req = parse(r#"{"student_id":"S","event_id":"E","attended":"yes"}"#);
        assert_matches!(req.attended.unwrap().to_bool(), Err(ApiError::BadRequest(_)));
    }

    #[test]
    fn feedback_comment_optional() {
        let req: FeedbackRequest =
            serde_json::from_str(r#"{"student_id":"S","event_id":"E","rating":4}"#).unwrap();
        assert_eq!(req.rating, 4);
        assert!(req.comment.is_none());
    }
}
