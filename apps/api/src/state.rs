//! Shared application state passed to the auth middleware and readiness
//! checks. Domain routers hold their own service state; this struct only
//! carries what the cross-cutting pieces need.

use axum_helpers::JwtAuth;
use database::postgres::DatabaseConnection;

/// Cloned per handler; the database connection is a pool handle and the
/// clones are cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub db: DatabaseConnection,
    pub jwt_auth: JwtAuth,
}
