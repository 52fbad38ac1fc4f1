use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::ValidatedJson;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::QuestionResult;
use crate::models::{
    BulkImportReport, CreateQuestion, QuestionFilter, QuestionResponse, QuestionWithAnswer,
    UpdateQuestion,
};
use crate::repository::QuestionRepository;
use crate::service::QuestionService;

/// Admin question-bank console.
///
/// Wired under `/admin/questions` behind the admin guard.
pub fn router<R: QuestionRepository + 'static>(service: QuestionService<R>) -> Router {
    Router::new()
        .route("/", get(list_questions).post(create_question))
        .route(
            "/{id}",
            get(get_question).patch(update_question).delete(delete_question),
        )
        .route("/bulk-import", post(bulk_import))
        .with_state(Arc::new(service))
}

/// Learner question feed for a practice round, correct answers withheld.
///
/// Wired under `/practice` behind the user guard.
pub fn practice_router<R: QuestionRepository + 'static>(service: QuestionService<R>) -> Router {
    Router::new()
        .route("/questions/{subject_id}", get(practice_questions))
        .with_state(Arc::new(service))
}

#[derive(Debug, Deserialize)]
struct PracticeQuestionParams {
    #[serde(default = "default_practice_limit")]
    limit: u64,
}

fn default_practice_limit() -> u64 {
    10
}

/// Active questions for a subject, answers withheld
///
/// GET /practice/questions/{subject_id}?limit=10
async fn practice_questions<R: QuestionRepository>(
    State(service): State<Arc<QuestionService<R>>>,
    Path(subject_id): Path<i32>,
    Query(params): Query<PracticeQuestionParams>,
) -> QuestionResult<Json<Vec<QuestionResponse>>> {
    let questions = service.practice_questions(subject_id, params.limit).await?;
    Ok(Json(questions))
}

/// List questions with filters
///
/// GET /admin/questions?subject_id=&difficulty_level=&is_active=&skip=&limit=
async fn list_questions<R: QuestionRepository>(
    State(service): State<Arc<QuestionService<R>>>,
    Query(filter): Query<QuestionFilter>,
) -> QuestionResult<Json<Vec<QuestionWithAnswer>>> {
    let questions = service.list_questions(filter).await?;
    Ok(Json(questions))
}

/// Create a question
///
/// POST /admin/questions
async fn create_question<R: QuestionRepository>(
    State(service): State<Arc<QuestionService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateQuestion>,
) -> QuestionResult<impl IntoResponse> {
    let question = service.create_question(input).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// Get a question (with answer)
///
/// GET /admin/questions/{id}
async fn get_question<R: QuestionRepository>(
    State(service): State<Arc<QuestionService<R>>>,
    Path(id): Path<i32>,
) -> QuestionResult<Json<QuestionWithAnswer>> {
    let question = service.get_question(id).await?;
    Ok(Json(question))
}

/// Patch a question (allow-listed fields only)
///
/// PATCH /admin/questions/{id}
async fn update_question<R: QuestionRepository>(
    State(service): State<Arc<QuestionService<R>>>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<UpdateQuestion>,
) -> QuestionResult<Json<QuestionWithAnswer>> {
    let question = service.update_question(id, input).await?;
    Ok(Json(question))
}

/// Soft-delete a question
///
/// DELETE /admin/questions/{id}
async fn delete_question<R: QuestionRepository>(
    State(service): State<Arc<QuestionService<R>>>,
    Path(id): Path<i32>,
) -> QuestionResult<impl IntoResponse> {
    service.delete_question(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize, Validate)]
struct BulkImportRequest {
    questions: Vec<CreateQuestion>,
}

/// Bulk-import questions: valid rows commit, failures are reported per
/// item
///
/// POST /admin/questions/bulk-import
async fn bulk_import<R: QuestionRepository>(
    State(service): State<Arc<QuestionService<R>>>,
    ValidatedJson(input): ValidatedJson<BulkImportRequest>,
) -> QuestionResult<Json<BulkImportReport>> {
    let report = service.bulk_import(input.questions).await?;
    Ok(Json(report))
}
