use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::detail_response;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Subject not found: {0}")]
    SubjectNotFound(i32),

    #[error("Content not found: {0}")]
    ContentNotFound(i32),

    #[error("Not enrolled in subject {0}")]
    NotEnrolled(i32),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            CatalogError::SubjectNotFound(_) => {
                (StatusCode::NOT_FOUND, "Subject not found".to_string())
            }
            CatalogError::ContentNotFound(_) => {
                (StatusCode::NOT_FOUND, "Content not found".to_string())
            }
            CatalogError::NotEnrolled(_) => {
                (StatusCode::NOT_FOUND, "Enrollment not found".to_string())
            }
            CatalogError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CatalogError::Database(msg) => {
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
