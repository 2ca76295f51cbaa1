//! REST API module for HTTP endpoints
//!
//! - `POST /process_event/` - Record one event
//! - `GET /events/` - All events
//! - `GET /users/:userid/events/` - Events for one user
//! - `POST /get_reports/` - Events for one user within a recency window

pub mod events;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::event_store::EventLogError;
use crate::validation::ValidationError;

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            error: message.into(),
            code: "VALIDATION_ERROR".to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: message.into(),
            code: "INTERNAL_ERROR".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::validation(e.to_string())
    }
}

impl From<EventLogError> for ApiError {
    fn from(e: EventLogError) -> Self {
        error!("storage failure: {}", e);
        ApiError::internal(format!("Database error: {}", e))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Well-formed JSON with a missing field or a value of the wrong type
            JsonRejection::JsonDataError(e) => ApiError::validation(e.body_text()),
            JsonRejection::JsonSyntaxError(e) => ApiError::bad_request(e.body_text()),
            other => Self {
                status: other.status(),
                error: other.body_text(),
                code: "BAD_REQUEST".to_string(),
            },
        }
    }
}

/// Run a blocking event-log call off the async executor
pub(crate) async fn run_blocking<T, F>(op: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, EventLogError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(op).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            error!("blocking task failed: {}", e);
            Err(ApiError::internal("request task failed"))
        }
    }
}
