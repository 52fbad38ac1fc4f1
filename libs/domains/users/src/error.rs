use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::detail_response;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(i32),

    #[error("Email already registered")]
    EmailTaken,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Inactive user")]
    InactiveUser,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            UserError::NotFound(_) => (StatusCode::NOT_FOUND, "User not found".to_string()),
            // The original API reports duplicate registration as a 400,
            // not a 409; existing clients match on that.
            UserError::EmailTaken => (
                StatusCode::BAD_REQUEST,
                "Email already registered".to_string(),
            ),
            UserError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Incorrect email or password".to_string(),
            ),
            UserError::InactiveUser => (StatusCode::UNAUTHORIZED, "Inactive user".to_string()),
            UserError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            UserError::PasswordHash(msg) => {
                tracing::error!("Password hash error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            UserError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            UserError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        detail_response(status, detail)
    }
}
