use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// The error body every failure in this API renders as.
///
/// Clients depend on this exact shape: a single human-readable `detail`
/// string next to the HTTP status code.
///
/// ```json
/// {"detail": "Email already registered"}
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Build an error response with the given status and `detail` message.
///
/// Domain error enums call this from their `IntoResponse` impls so the wire
/// contract stays in one place.
pub fn detail_response(status: StatusCode, detail: impl Into<String>) -> Response {
    (status, Json(ErrorDetail::new(detail))).into_response()
}

/// Fallback handler for unmatched routes.
pub async fn not_found() -> Response {
    detail_response(StatusCode::NOT_FOUND, "Not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_body_shape() {
        let body = serde_json::to_value(ErrorDetail::new("boom")).unwrap();
        assert_eq!(body, serde_json::json!({"detail": "boom"}));
    }

    #[test]
    fn test_detail_response_status() {
        let response = detail_response(StatusCode::NOT_FOUND, "User not found");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
