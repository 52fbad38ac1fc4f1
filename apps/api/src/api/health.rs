use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// Readiness probe: verifies the datastore answers
///
/// GET /ready
pub async fn ready_handler(State(state): State<AppState>) -> impl IntoResponse {
    match database::postgres::check_health(&state.db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({"ready": true, "database": "connected"})),
        ),
        Err(e) => {
            tracing::error!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"ready": false, "database": "disconnected"})),
            )
        }
    }
}
