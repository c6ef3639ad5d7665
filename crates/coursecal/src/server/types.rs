use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::schedule::ScheduleError;

/// Error body returned by every endpoint
#[derive(Debug, Serialize)]
pub struct ApiErrorType {
    #[serde(skip)]
    status: StatusCode,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl From<(StatusCode, &str, Option<String>)> for ApiErrorType {
    fn from((status, error, details): (StatusCode, &str, Option<String>)) -> Self {
        Self {
            status,
            error: error.to_string(),
            details,
        }
    }
}

impl From<ScheduleError> for ApiErrorType {
    fn from(err: ScheduleError) -> Self {
        let (status, message) = match &err {
            ScheduleError::BadRequest { .. } => (StatusCode::BAD_REQUEST, "Invalid request"),
            ScheduleError::UnknownTerm { .. } => (StatusCode::NOT_FOUND, "Unknown term"),
            ScheduleError::NotFound { .. } => (StatusCode::NOT_FOUND, "Course not found"),
            ScheduleError::Fetch { .. } => (
                StatusCode::BAD_GATEWAY,
                "Failed to fetch course schedule",
            ),
            ScheduleError::Validation { .. } | ScheduleError::Parse { .. } => (
                StatusCode::BAD_GATEWAY,
                "Course schedule data could not be understood",
            ),
        };

        ApiErrorType::from((status, message, Some(err.to_string())))
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
