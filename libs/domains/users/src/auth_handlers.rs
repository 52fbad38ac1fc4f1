use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{CurrentUser, JwtAuth, ValidatedJson};

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, LoginRequest, RegisterRequest, TokenResponse, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

/// State for the auth endpoints
#[derive(Clone)]
pub struct AuthState<R: UserRepository> {
    pub service: UserService<R>,
    pub jwt_auth: JwtAuth,
}

/// Public auth routes: registration and login.
pub fn public_router<R: UserRepository + Clone + 'static>(state: AuthState<R>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(state)
}

/// Routes that need a resolved user; the caller layers the auth middleware.
pub fn me_router<R: UserRepository + Clone + 'static>(state: AuthState<R>) -> Router {
    Router::new().route("/me", get(me)).with_state(state)
}

/// Register a new user
///
/// POST /auth/register
async fn register<R: UserRepository + Clone>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> UserResult<Json<UserResponse>> {
    // Self-service registration never grants admin
    let user = state
        .service
        .create_user(CreateUser {
            email: input.email,
            full_name: input.full_name,
            password: input.password,
            is_admin: false,
        })
        .await?;

    Ok(Json(user))
}

/// Login with email/password, returning a bearer token
///
/// POST /auth/login
async fn login<R: UserRepository + Clone>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<TokenResponse>> {
    let user = state
        .service
        .verify_credentials(&input.email, &input.password)
        .await?;

    let access_token = state.jwt_auth.create_token(&user.email).map_err(|e| {
        tracing::error!("Failed to create access token: {:?}", e);
        UserError::Internal("Failed to create token".to_string())
    })?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// Resolve the current user from the bearer token
///
/// GET /auth/me
async fn me<R: UserRepository + Clone>(
    State(state): State<AuthState<R>>,
    current: CurrentUser,
) -> UserResult<Json<UserResponse>> {
    let user = state.service.get_user(current.id).await?;
    Ok(Json(user))
}
