//! Colleges, students and events.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use campus_store::{EventRow, EventType, StudentRow};
use serde::Deserialize;
use serde_json::{Value, json};

use super::run_store;
use crate::errors::ApiError;
use crate::server::AppState;

/// `POST /colleges` body.
#[derive(Debug, Deserialize)]
pub struct CreateCollege {
    /// College ID.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// `POST /students` body.
#[derive(Debug, Deserialize)]
pub struct CreateStudent {
    /// Student ID.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Owning college.
    pub college_id: String,
}

/// `POST /events` body. `type` is validated after parsing so that an unknown
/// value is reported as an invalid enum rather than a malformed body.
#[derive(Debug, Deserialize)]
pub struct CreateEvent {
    /// Event ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// One of `Workshop`, `Hackathon`, `Fest`, `Seminar`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event date.
    pub date: String,
    /// Owning college.
    pub college_id: String,
}

/// POST /colleges
pub async fn create_college(
    State(state): State<AppState>,
    payload: Result<Json<CreateCollege>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(body) = payload?;
    let row = run_store(&state, move |store| store.create_college(&body.id, &body.name)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "College created", "college_id": row.id })),
    ))
}

/// POST /students
pub async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<CreateStudent>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(body) = payload?;
    let row = run_store(&state, move |store| {
        store.create_student(&body.id, &body.name, &body.email, &body.college_id)
    })
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Student created", "student_id": row.id })),
    ))
}

/// GET /students/{id}
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StudentRow>, ApiError> {
    let row = run_store(&state, move |store| store.get_student(&id)).await?;
    Ok(Json(row))
}

/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<CreateEvent>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(body) = payload?;
    let event_type = EventType::parse_field(&body.event_type)?;
    let row = run_store(&state, move |store| {
        store.create_event(&body.id, &body.name, event_type, &body.date, &body.college_id)
    })
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Event created", "event_id": row.id })),
    ))
}

/// GET /events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EventRow>, ApiError> {
    let row = run_store(&state, move |store| store.get_event(&id)).await?;
    Ok(Json(row))
}
