//! Event ingestion and query endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{run_blocking, ApiError};
use crate::api::state::AppState;
use crate::types::{EventRecord, NewEvent};
use crate::validation::{validate_new_event, validate_userid};

/// Response for POST /process_event/
#[derive(Debug, Serialize)]
pub struct ProcessEventResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub data: EventRecord,
}

/// Response for every endpoint returning a list of events
#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<EventRecord>,
}

/// Body of POST /get_reports/
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub userid: String,
    /// Window length in seconds; negative values fail to decode
    pub lastseconds: u64,
}

/// POST /process_event/ - Stamp and store one event
pub async fn process_event(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<Json<ProcessEventResponse>, ApiError> {
    let Json(event) = payload?;
    validate_new_event(&event)?;

    let record = run_blocking(move || state.log.append_event(&event)).await?;

    Ok(Json(ProcessEventResponse {
        status: "success",
        message: "Event added successfully",
        data: record,
    }))
}

/// GET /events/ - Every stored event in insertion order
pub async fn get_all_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EventsResponse>, ApiError> {
    let events = run_blocking(move || state.log.read_all()).await?;
    Ok(Json(EventsResponse { events }))
}

/// GET /users/:userid/events/ - Every event of one user
pub async fn get_user_events(
    State(state): State<Arc<AppState>>,
    Path(userid): Path<String>,
) -> Result<Json<EventsResponse>, ApiError> {
    validate_userid(&userid)?;

    let events = run_blocking(move || state.log.read_by_user(&userid)).await?;
    Ok(Json(EventsResponse { events }))
}

/// POST /get_reports/ - Events of one user within the last `lastseconds`
pub async fn get_reports(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<EventsResponse>, ApiError> {
    let Json(request) = payload?;
    validate_userid(&request.userid)?;

    let events = run_blocking(move || {
        state
            .reports
            .report(&request.userid, request.lastseconds)
    })
    .await?;
    Ok(Json(EventsResponse { events }))
}
