use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use axum_helpers::{CurrentUser, ValidatedJson};
use domain_questions::repository::QuestionRepository;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::PracticeResult;
use crate::models::{
    AttemptResponse, CompleteSession, CreateAttempt, CreateSession, SessionFilter,
    SessionResponse, UserStatistics,
};
use crate::repository::PracticeRepository;
use crate::service::PracticeService;

/// Learner-facing practice routes.
///
/// Wired under `/practice` behind the user guard.
pub fn router<R, Q>(service: PracticeService<R, Q>) -> Router
where
    R: PracticeRepository + 'static,
    Q: QuestionRepository + 'static,
{
    Router::new()
        .route("/sessions", post(start_session).get(my_sessions))
        .route("/sessions/{id}", put(complete_session))
        .route("/attempts", post(record_attempt).get(my_attempts))
        .route("/statistics", get(statistics))
        .with_state(Arc::new(service))
}

/// Admin session console.
///
/// Wired under `/admin/practice-sessions` behind the admin guard.
pub fn admin_sessions_router<R, Q>(service: PracticeService<R, Q>) -> Router
where
    R: PracticeRepository + 'static,
    Q: QuestionRepository + 'static,
{
    Router::new()
        .route("/", get(list_sessions))
        .route("/{id}", get(get_session).delete(delete_session))
        .with_state(Arc::new(service))
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    skip: u64,
    #[serde(default = "default_limit")]
    limit: u64,
}

fn default_limit() -> u64 {
    100
}

/// Open a practice session
///
/// POST /practice/sessions
async fn start_session<R: PracticeRepository, Q: QuestionRepository>(
    State(service): State<Arc<PracticeService<R, Q>>>,
    current: CurrentUser,
    ValidatedJson(input): ValidatedJson<CreateSession>,
) -> PracticeResult<impl IntoResponse> {
    let session = service.start_session(current.id, input).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Record one answered question; correctness is frozen here
///
/// POST /practice/attempts
async fn record_attempt<R: PracticeRepository, Q: QuestionRepository>(
    State(service): State<Arc<PracticeService<R, Q>>>,
    current: CurrentUser,
    ValidatedJson(input): ValidatedJson<CreateAttempt>,
) -> PracticeResult<impl IntoResponse> {
    let attempt = service.record_attempt(current.id, input).await?;
    Ok((StatusCode::CREATED, Json(attempt)))
}

/// Store the completion summary for an owned session
///
/// PUT /practice/sessions/{id}
async fn complete_session<R: PracticeRepository, Q: QuestionRepository>(
    State(service): State<Arc<PracticeService<R, Q>>>,
    current: CurrentUser,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<CompleteSession>,
) -> PracticeResult<Json<SessionResponse>> {
    let session = service.complete_session(current.id, id, input).await?;
    Ok(Json(session))
}

/// The caller's sessions, newest first
///
/// GET /practice/sessions?skip=&limit=
async fn my_sessions<R: PracticeRepository, Q: QuestionRepository>(
    State(service): State<Arc<PracticeService<R, Q>>>,
    current: CurrentUser,
    Query(page): Query<Page>,
) -> PracticeResult<Json<Vec<SessionResponse>>> {
    let sessions = service.my_sessions(current.id, page.skip, page.limit).await?;
    Ok(Json(sessions))
}

/// The caller's attempts, newest first
///
/// GET /practice/attempts?skip=&limit=
async fn my_attempts<R: PracticeRepository, Q: QuestionRepository>(
    State(service): State<Arc<PracticeService<R, Q>>>,
    current: CurrentUser,
    Query(page): Query<Page>,
) -> PracticeResult<Json<Vec<AttemptResponse>>> {
    let attempts = service.my_attempts(current.id, page.skip, page.limit).await?;
    Ok(Json(attempts))
}

/// The caller's aggregate statistics
///
/// GET /practice/statistics
async fn statistics<R: PracticeRepository, Q: QuestionRepository>(
    State(service): State<Arc<PracticeService<R, Q>>>,
    current: CurrentUser,
) -> PracticeResult<Json<UserStatistics>> {
    let stats = service.statistics(current.id).await?;
    Ok(Json(stats))
}

/// List sessions across users (admin)
///
/// GET /admin/practice-sessions?user_id=&subject_id=&skip=&limit=
async fn list_sessions<R: PracticeRepository, Q: QuestionRepository>(
    State(service): State<Arc<PracticeService<R, Q>>>,
    Query(filter): Query<SessionFilter>,
) -> PracticeResult<Json<Vec<SessionResponse>>> {
    let sessions = service.list_sessions(filter).await?;
    Ok(Json(sessions))
}

/// Get any session by ID (admin)
///
/// GET /admin/practice-sessions/{id}
async fn get_session<R: PracticeRepository, Q: QuestionRepository>(
    State(service): State<Arc<PracticeService<R, Q>>>,
    Path(id): Path<i32>,
) -> PracticeResult<Json<SessionResponse>> {
    let session = service.get_session(id).await?;
    Ok(Json(session))
}

/// Hard-delete a session and its attempts (admin)
///
/// DELETE /admin/practice-sessions/{id}
async fn delete_session<R: PracticeRepository, Q: QuestionRepository>(
    State(service): State<Arc<PracticeService<R, Q>>>,
    Path(id): Path<i32>,
) -> PracticeResult<impl IntoResponse> {
    service.delete_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
