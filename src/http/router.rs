use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::limits::MAX_BODY_BYTES;

use super::handlers;
use super::AppState;

/// API version prefix for every route.
pub const API_VERSION: &str = "v1";

pub fn create_router(state: AppState) -> Router {
    // Method routers answer 405 for anything not listed.
    let api = Router::new()
        .route("/getappointments", get(handlers::available_appointments))
        .route("/getscheduled", get(handlers::scheduled_appointments))
        .route("/postappointment", post(handlers::post_appointment))
        .route("/health", get(handlers::health));

    Router::new()
        .nest(&format!("/{API_VERSION}"), api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
