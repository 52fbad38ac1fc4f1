use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::AdminResult;
use crate::models::{
    BackupDocument, CleanupReport, DailyStats, DifficultyStats, OverviewStats, RestoreReport,
    SubjectStats, TopUserStats,
};
use crate::repository::SystemRepository;
use crate::service::SystemService;

/// System console routes.
///
/// Wired under `/admin/system` behind the admin guard.
pub fn router<R: SystemRepository + 'static>(service: SystemService<R>) -> Router {
    Router::new()
        .route("/backup", get(backup))
        .route("/restore", post(restore))
        .route("/cleanup", post(cleanup))
        .route("/analytics/overview", get(overview))
        .route("/analytics/by-subject", get(by_subject))
        .route("/analytics/by-difficulty", get(by_difficulty))
        .route("/analytics/daily", get(daily))
        .route("/analytics/top-users", get(top_users))
        .with_state(Arc::new(service))
}

/// Full JSON dump of the six core tables
///
/// GET /admin/system/backup
async fn backup<R: SystemRepository>(
    State(service): State<Arc<SystemService<R>>>,
) -> AdminResult<Json<BackupDocument>> {
    let document = service.backup().await?;
    Ok(Json(document))
}

/// Replace-all restore; any malformed row rolls the whole thing back
///
/// POST /admin/system/restore
async fn restore<R: SystemRepository>(
    State(service): State<Arc<SystemService<R>>>,
    Json(document): Json<BackupDocument>,
) -> AdminResult<Json<RestoreReport>> {
    let report = service.restore(document).await?;
    Ok(Json(report))
}

/// Purge malformed rows and report the counts
///
/// POST /admin/system/cleanup
async fn cleanup<R: SystemRepository>(
    State(service): State<Arc<SystemService<R>>>,
) -> AdminResult<Json<CleanupReport>> {
    let report = service.cleanup().await?;
    Ok(Json(report))
}

/// Platform-wide counts
///
/// GET /admin/system/analytics/overview
async fn overview<R: SystemRepository>(
    State(service): State<Arc<SystemService<R>>>,
) -> AdminResult<Json<OverviewStats>> {
    let stats = service.overview().await?;
    Ok(Json(stats))
}

/// Aggregates grouped by subject
///
/// GET /admin/system/analytics/by-subject
async fn by_subject<R: SystemRepository>(
    State(service): State<Arc<SystemService<R>>>,
) -> AdminResult<Json<Vec<SubjectStats>>> {
    let stats = service.by_subject().await?;
    Ok(Json(stats))
}

/// Aggregates grouped by difficulty tier
///
/// GET /admin/system/analytics/by-difficulty
async fn by_difficulty<R: SystemRepository>(
    State(service): State<Arc<SystemService<R>>>,
) -> AdminResult<Json<Vec<DifficultyStats>>> {
    let stats = service.by_difficulty().await?;
    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
struct DailyParams {
    #[serde(default = "default_days")]
    days: u32,
}

fn default_days() -> u32 {
    7
}

/// Daily session counts over the trailing window (7 days by default,
/// 30 for the monthly view)
///
/// GET /admin/system/analytics/daily?days=7
async fn daily<R: SystemRepository>(
    State(service): State<Arc<SystemService<R>>>,
    Query(params): Query<DailyParams>,
) -> AdminResult<Json<Vec<DailyStats>>> {
    let stats = service.daily(params.days).await?;
    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
struct TopUsersParams {
    #[serde(default = "default_top_limit")]
    limit: u64,
}

fn default_top_limit() -> u64 {
    10
}

/// Top users by mean score
///
/// GET /admin/system/analytics/top-users?limit=10
async fn top_users<R: SystemRepository>(
    State(service): State<Arc<SystemService<R>>>,
    Query(params): Query<TopUsersParams>,
) -> AdminResult<Json<Vec<TopUserStats>>> {
    let stats = service.top_users(params.limit).await?;
    Ok(Json(stats))
}
