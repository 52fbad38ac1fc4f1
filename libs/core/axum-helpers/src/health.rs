use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Liveness endpoint: always 200 while the process is up.
///
/// Readiness (datastore reachability) is a separate endpoint wired by the
/// application, which owns the connections to check.
pub fn health_router(service_name: &'static str) -> Router {
    Router::new().route(
        "/health",
        get(move || async move {
            (
                StatusCode::OK,
                Json(HealthResponse {
                    status: "healthy".to_string(),
                    service: service_name.to_string(),
                }),
            )
                .into_response()
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_returns_ok() {
        let app = health_router("test-service");
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
