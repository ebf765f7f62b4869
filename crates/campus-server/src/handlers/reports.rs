//! Report endpoints and the demo seed.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use campus_store::{
    AttendancePercentageRow, AverageFeedbackRow, DEFAULT_TOP_STUDENTS, EventSummaryRow, EventType,
    RegistrationCountRow, StoreError, TopStudentRow,
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::run_store;
use crate::errors::ApiError;
use crate::server::AppState;

/// `GET /reports/top-students` query.
#[derive(Debug, Default, Deserialize)]
pub struct TopStudentsQuery {
    /// Number of rows, default 3.
    pub limit: Option<i64>,
}

/// `GET /reports/events` query.
#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    /// Event type to filter by. Required.
    #[serde(rename = "type")]
    pub event_type: Option<String>,
}

impl EventsQuery {
    /// Validate the `type` parameter.
    pub fn event_type(&self) -> Result<EventType, StoreError> {
        match self.event_type.as_deref() {
            None | Some("") => Err(StoreError::MissingParameter("type")),
            Some(raw) => EventType::parse_field(raw),
        }
    }
}

/// GET /reports/registrations
pub async fn registrations(
    State(state): State<AppState>,
) -> Result<Json<Vec<RegistrationCountRow>>, ApiError> {
    Ok(Json(run_store(&state, |store| store.registration_counts()).await?))
}

/// GET /reports/attendance
pub async fn attendance(
    State(state): State<AppState>,
) -> Result<Json<Vec<AttendancePercentageRow>>, ApiError> {
    Ok(Json(run_store(&state, |store| store.attendance_percentage()).await?))
}

/// GET /reports/feedback
pub async fn feedback(
    State(state): State<AppState>,
) -> Result<Json<Vec<AverageFeedbackRow>>, ApiError> {
    Ok(Json(run_store(&state, |store| store.average_feedback()).await?))
}

/// GET /reports/top-students?limit=N
pub async fn top_students(
    State(state): State<AppState>,
    query: Result<Query<TopStudentsQuery>, QueryRejection>,
) -> Result<Json<Vec<TopStudentRow>>, ApiError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_TOP_STUDENTS);
    Ok(Json(run_store(&state, move |store| store.top_students(limit)).await?))
}

/// GET /reports/events?type=T
pub async fn events_by_type(
    State(state): State<AppState>,
    query: Result<Query<EventsQuery>, QueryRejection>,
) -> Result<Json<Vec<EventSummaryRow>>, ApiError> {
    let Query(query) = query?;
    let event_type = query.event_type()?;
    Ok(Json(
        run_store(&state, move |store| store.events_by_type(event_type)).await?,
    ))
}

/// GET /seed
pub async fn seed(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let _ = run_store(&state, |store| store.seed_demo_data()).await?;
    Ok(Json(json!({ "message": "Sample data seeded!" })))
}
