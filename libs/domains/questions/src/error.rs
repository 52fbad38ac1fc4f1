use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::detail_response;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuestionError {
    #[error("Question not found: {0}")]
    NotFound(i32),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type QuestionResult<T> = Result<T, QuestionError>;

impl IntoResponse for QuestionError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            QuestionError::NotFound(_) => (StatusCode::NOT_FOUND, "Question not found".to_string()),
            QuestionError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            QuestionError::Database(msg) => {
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
