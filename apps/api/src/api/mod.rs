use axum::{middleware, routing::get, Json, Router};
use serde_json::json;

pub mod health;

use crate::auth;
use crate::state::AppState;

use domain_admin::{PgSystemRepository, SystemService};
use domain_catalog::{handlers as catalog, CatalogService, PgCatalogRepository};
use domain_practice::{handlers as practice, PgPracticeRepository, PracticeService};
use domain_questions::{handlers as questions, PgQuestionRepository, QuestionService};
use domain_users::{auth_handlers, handlers as users, PgUserRepository, UserService};

/// Compose every route group. Domain routers carry their own service
/// state; the auth middleware layers wrap whole groups so no handler
/// re-checks privileges.
pub fn routes(state: &AppState) -> Router {
    let user_guard = middleware::from_fn_with_state(state.clone(), auth::require_user);
    let admin_guard = middleware::from_fn_with_state(state.clone(), auth::require_admin);

    let catalog_service = || CatalogService::new(PgCatalogRepository::new(state.db.clone()));
    let question_service = || QuestionService::new(PgQuestionRepository::new(state.db.clone()));
    let practice_service = || {
        PracticeService::new(
            PgPracticeRepository::new(state.db.clone()),
            PgQuestionRepository::new(state.db.clone()),
        )
    };
    let user_service = || UserService::new(PgUserRepository::new(state.db.clone()));
    let system_service = || SystemService::new(PgSystemRepository::new(state.db.clone()));

    let auth_state = auth_handlers::AuthState {
        service: user_service(),
        jwt_auth: state.jwt_auth.clone(),
    };

    let auth_routes = auth_handlers::public_router(auth_state.clone()).merge(
        auth_handlers::me_router(auth_state).layer(user_guard.clone()),
    );

    let practice_routes = practice::router(practice_service())
        .merge(questions::practice_router(question_service()))
        .merge(catalog::practice_subjects_router(catalog_service()))
        .layer(user_guard.clone());

    Router::new()
        .route("/", get(root))
        // Public surface
        .nest("/auth", auth_routes)
        .nest("/library", catalog::library_router(catalog_service()))
        // Authenticated users
        .nest(
            "/enrollments",
            catalog::enrollments_router(catalog_service()).layer(user_guard.clone()),
        )
        .nest(
            "/my-courses",
            catalog::my_courses_router(catalog_service()).layer(user_guard),
        )
        .nest("/practice", practice_routes)
        // Admin console
        .nest(
            "/subjects",
            catalog::subjects_router(catalog_service()).layer(admin_guard.clone()),
        )
        .nest(
            "/contents",
            catalog::contents_router(catalog_service()).layer(admin_guard.clone()),
        )
        .nest(
            "/admin/users",
            users::router(user_service()).layer(admin_guard.clone()),
        )
        .nest(
            "/admin/questions",
            questions::router(question_service()).layer(admin_guard.clone()),
        )
        .nest(
            "/admin/practice-sessions",
            practice::admin_sessions_router(practice_service()).layer(admin_guard.clone()),
        )
        .nest(
            "/admin/system",
            domain_admin::handlers::router(system_service()).layer(admin_guard),
        )
}

/// Readiness router with actual datastore checks
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

/// Service banner
///
/// GET /
async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Welcome to StudyLearn API",
        "status": "running"
    }))
}
