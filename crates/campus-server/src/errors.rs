//! HTTP error mapping.
//!
//! Every failure is answered with `{"error": "<message>"}` and a status
//! derived from the underlying [`StoreError`].

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use campus_store::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Malformed body, query string or field value.
    #[error("{0}")]
    BadRequest(String),

    /// A blocking task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Store(err) => match err {
                StoreError::DuplicateKey { .. } => StatusCode::CONFLICT,
                StoreError::AlreadyRegistered { .. }
                | StoreError::InvalidEnum { .. }
                | StoreError::InvalidRange { .. }
                | StoreError::MissingParameter(_) => StatusCode::BAD_REQUEST,
                StoreError::StudentNotFound(_)
                | StoreError::EventNotFound(_)
                | StoreError::CollegeNotFound(_) => StatusCode::NOT_FOUND,
                StoreError::Sqlite(_) | StoreError::Pool(_) | StoreError::Migration { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the `error` field.
    fn message(&self) -> String {
        match self {
            Self::Store(StoreError::AlreadyRegistered { .. }) => "Already registered".into(),
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            debug!(status = status.as_u16(), error = %message, "request rejected");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn duplicate_is_conflict() {
        let (status, body) = body_of(
            StoreError::DuplicateKey {
                entity: "student",
                id: "S1".into(),
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "student already exists: S1");
    }

    #[tokio::test]
    async fn already_registered_message() {
        let (status, body) = body_of(
            StoreError::AlreadyRegistered {
                student_id: "S1".into(),
                event_id: "E1".into(),
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Already registered" }));
    }

    #[test]
    fn validation_errors_are_bad_request() {
        let cases: Vec<ApiError> = vec![
            StoreError::MissingParameter("type").into(),
            StoreError::InvalidRange {
                field: "rating",
                value: 9,
                min: 1,
                max: 5,
            }
            .into(),
            StoreError::InvalidEnum {
                field: "type",
                value: "Party".into(),
                expected: "Workshop",
            }
            .into(),
            ApiError::BadRequest("bad json".into()),
        ];
        for err in cases {
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{err}");
        }
    }

    #[test]
    fn not_found_variants() {
        for err in [
            StoreError::StudentNotFound("x".into()),
            StoreError::EventNotFound("x".into()),
            StoreError::CollegeNotFound("x".into()),
        ] {
            assert_eq!(ApiError::from(err).status(), StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn storage_failure_is_not_masked() {
        let (status, body) = body_of(
            StoreError::Migration {
                message: "v1 failed".into(),
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "migration error: v1 failed");
    }

    #[test]
    fn task_failure_is_internal() {
        assert_eq!(
            ApiError::Task("panicked".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
