//! Bearer-token auth middleware.
//!
//! One reusable predicate per privilege level instead of per-route
//! checks: `require_user` resolves the token's subject claim to a live,
//! active user and stashes it as a `CurrentUser` extension; `require_admin`
//! additionally demands the admin flag. Every failure is terminal and maps
//! to 401 (or 403 for a non-admin) with a `detail` body.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_helpers::{detail_response, CurrentUser};
use domain_users::{PgUserRepository, UserService};

use crate::state::AppState;

pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    match resolve_user(&state, req.headers()).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(response) => response,
    }
}

pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    match resolve_user(&state, req.headers()).await {
        Ok(user) if user.is_admin => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Ok(_) => detail_response(StatusCode::FORBIDDEN, "Not authorized"),
        Err(response) => response,
    }
}

async fn resolve_user(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser, Response> {
    let unauthenticated =
        || detail_response(StatusCode::UNAUTHORIZED, "Could not validate credentials");

    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| detail_response(StatusCode::UNAUTHORIZED, "Not authenticated"))?;

    let token = header.strip_prefix("Bearer ").ok_or_else(unauthenticated)?;

    let claims = state
        .jwt_auth
        .verify_token(token)
        .map_err(|_| unauthenticated())?;

    let service = UserService::new(PgUserRepository::new(state.db.clone()));
    let user = service
        .resolve_active_user(&claims.sub)
        .await
        .map_err(IntoResponse::into_response)?
        .ok_or_else(unauthenticated)?;

    Ok(CurrentUser {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        is_admin: user.is_admin,
    })
}
