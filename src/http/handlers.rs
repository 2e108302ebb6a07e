use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use super::error::AppError;
use super::AppState;
use crate::catalog;
use crate::observability;

/// Decoded query pairs in request order. A repeated key keeps every value;
/// lookups take the first one.
pub type QueryPairs = Vec<(String, String)>;

fn required<'a>(pairs: &'a [(String, String)], name: &str) -> Result<&'a str, AppError> {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
        .ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
}

fn parse_trainer_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|e| AppError::BadRequest(format!("trainer_id must be an integer: {e}")))
}

fn observe(endpoint: &'static str, response: Response) -> Response {
    observability::record_request(endpoint, response.status().as_u16());
    response
}

/// GET /v1/getappointments?trainer_id&starts_at&ends_at
pub async fn available_appointments(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> Response {
    let result = async {
        let trainer_id = required(&params, "trainer_id")?;
        let starts_at = required(&params, "starts_at")?;
        let ends_at = required(&params, "ends_at")?;
        let trainer_id = parse_trainer_id(trainer_id)?;
        let slots = state
            .scheduler
            .available_slots(trainer_id, starts_at, ends_at)
            .await?;
        Ok::<_, AppError>(Json(slots))
    }
    .await;
    observe("getappointments", result.into_response())
}

/// GET /v1/getscheduled?trainer_id
pub async fn scheduled_appointments(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> Response {
    let result = async {
        let trainer_id = parse_trainer_id(required(&params, "trainer_id")?)?;
        let appointments = state.scheduler.scheduled_appointments(trainer_id).await?;
        Ok::<_, AppError>(Json(appointments))
    }
    .await;
    observe("getscheduled", result.into_response())
}

/// POST /v1/postappointment
pub async fn post_appointment(State(state): State<AppState>, body: Bytes) -> Response {
    let result = async {
        let appointment = catalog::decode_appointment(&body).map_err(|e| {
            warn!("error decoding booking request: {e}");
            AppError::BadRequest(format!("invalid appointment: {e}"))
        })?;
        state.scheduler.book(appointment).await?;
        Ok::<_, AppError>((StatusCode::OK, "posted successfully"))
    }
    .await;
    observe("postappointment", result.into_response())
}

/// GET /v1/health
pub async fn health() -> &'static str {
    "OK"
}
