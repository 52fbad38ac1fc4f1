use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::detail_response;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Restore failed: {0}")]
    RestoreFailed(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type AdminResult<T> = Result<T, AdminError>;

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AdminError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AdminError::RestoreFailed(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Restore failed: {}", msg),
            ),
            AdminError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        detail_response(status, detail)
    }
}
