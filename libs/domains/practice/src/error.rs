use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::detail_response;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PracticeError {
    #[error("Session not found: {0}")]
    SessionNotFound(i32),

    #[error("Question not found: {0}")]
    QuestionNotFound(i32),

    #[error("Subject not found: {0}")]
    SubjectNotFound(i32),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type PracticeResult<T> = Result<T, PracticeError>;

impl IntoResponse for PracticeError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            PracticeError::SessionNotFound(_) => {
                (StatusCode::NOT_FOUND, "Session not found".to_string())
            }
            PracticeError::QuestionNotFound(_) => {
                (StatusCode::NOT_FOUND, "Question not found".to_string())
            }
            PracticeError::SubjectNotFound(_) => {
                (StatusCode::NOT_FOUND, "Subject not found".to_string())
            }
            PracticeError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            PracticeError::Database(msg) => {
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
