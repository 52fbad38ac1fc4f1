use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{CurrentUser, ValidatedJson};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::CatalogResult;
use crate::models::{
    CreateContent, CreateLesson, CreateSubject, EnrollmentResponse, LessonResponse,
    SubjectContentResponse, SubjectFilter, SubjectResponse, UpdateSubject,
};
use crate::repository::CatalogRepository;
use crate::service::CatalogService;

/// Public course catalog.
///
/// Wired under `/library` with no auth.
pub fn library_router<R: CatalogRepository + 'static>(service: CatalogService<R>) -> Router {
    Router::new()
        .route("/courses", get(list_courses))
        .with_state(Arc::new(service))
}

/// Admin subject CRUD plus the content tree.
///
/// Wired under `/subjects` behind the admin guard.
pub fn subjects_router<R: CatalogRepository + 'static>(service: CatalogService<R>) -> Router {
    Router::new()
        .route("/", get(list_subjects).post(create_subject))
        .route(
            "/{id}",
            get(get_subject).patch(update_subject).delete(delete_subject),
        )
        .route("/{id}/contents", get(list_contents).post(add_content))
        .with_state(Arc::new(service))
}

/// Admin lesson routes, wired under `/contents` behind the admin guard.
pub fn contents_router<R: CatalogRepository + 'static>(service: CatalogService<R>) -> Router {
    Router::new()
        .route("/{id}/lessons", get(list_lessons).post(add_lesson))
        .with_state(Arc::new(service))
}

/// Active subjects for the practice picker; same data as the public
/// catalog, served inside the authenticated practice area.
pub fn practice_subjects_router<R: CatalogRepository + 'static>(
    service: CatalogService<R>,
) -> Router {
    Router::new()
        .route("/subjects", get(list_courses))
        .with_state(Arc::new(service))
}

/// Self-service enrollment, wired under `/enrollments` behind the user guard.
pub fn enrollments_router<R: CatalogRepository + 'static>(service: CatalogService<R>) -> Router {
    Router::new()
        .route("/{subject_id}", post(enroll).delete(unenroll))
        .with_state(Arc::new(service))
}

/// The caller's active enrollments, wired under `/my-courses` behind the
/// user guard.
pub fn my_courses_router<R: CatalogRepository + 'static>(service: CatalogService<R>) -> Router {
    Router::new()
        .route("/", get(my_courses))
        .with_state(Arc::new(service))
}

/// List active subjects/courses (public)
///
/// GET /library/courses
async fn list_courses<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> CatalogResult<Json<Vec<SubjectResponse>>> {
    let subjects = service.list_active_subjects().await?;
    Ok(Json(subjects))
}

/// List subjects (admin view, inactive included)
///
/// GET /subjects?is_active=&skip=&limit=
async fn list_subjects<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Query(filter): Query<SubjectFilter>,
) -> CatalogResult<Json<Vec<SubjectResponse>>> {
    let subjects = service.list_subjects(filter).await?;
    Ok(Json(subjects))
}

/// Create a subject
///
/// POST /subjects
async fn create_subject<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateSubject>,
) -> CatalogResult<impl IntoResponse> {
    let subject = service.create_subject(input).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

/// Get a subject by ID
///
/// GET /subjects/{id}
async fn get_subject<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Path(id): Path<i32>,
) -> CatalogResult<Json<SubjectResponse>> {
    let subject = service.get_subject(id).await?;
    Ok(Json(subject))
}

/// Patch a subject (allow-listed fields only)
///
/// PATCH /subjects/{id}
async fn update_subject<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<UpdateSubject>,
) -> CatalogResult<Json<SubjectResponse>> {
    let subject = service.update_subject(id, input).await?;
    Ok(Json(subject))
}

#[derive(Debug, Default, Deserialize)]
struct DeleteSubjectParams {
    #[serde(default)]
    hard: bool,
}

/// Delete a subject: soft flip by default, `?hard=true` removes the row
/// and its dependents
///
/// DELETE /subjects/{id}
async fn delete_subject<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Path(id): Path<i32>,
    Query(params): Query<DeleteSubjectParams>,
) -> CatalogResult<impl IntoResponse> {
    service.delete_subject(id, params.hard).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List content blocks for a subject
///
/// GET /subjects/{id}/contents
async fn list_contents<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Path(id): Path<i32>,
) -> CatalogResult<Json<Vec<SubjectContentResponse>>> {
    let contents = service.list_contents(id).await?;
    Ok(Json(contents))
}

/// Attach a content block to a subject
///
/// POST /subjects/{id}/contents
async fn add_content<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<CreateContent>,
) -> CatalogResult<impl IntoResponse> {
    let content = service.add_content(id, input).await?;
    Ok((StatusCode::CREATED, Json(content)))
}

/// List lessons for a content block
///
/// GET /contents/{id}/lessons
async fn list_lessons<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Path(id): Path<i32>,
) -> CatalogResult<Json<Vec<LessonResponse>>> {
    let lessons = service.list_lessons(id).await?;
    Ok(Json(lessons))
}

/// Attach a lesson to a content block
///
/// POST /contents/{id}/lessons
async fn add_lesson<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<CreateLesson>,
) -> CatalogResult<impl IntoResponse> {
    let lesson = service.add_lesson(id, input).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

/// Enroll the caller in a subject (idempotent)
///
/// POST /enrollments/{subject_id}
async fn enroll<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    current: CurrentUser,
    Path(subject_id): Path<i32>,
) -> CatalogResult<Json<EnrollmentResponse>> {
    let enrollment = service.enroll_user(current.id, subject_id).await?;
    Ok(Json(enrollment))
}

/// Unenroll the caller from a subject (soft)
///
/// DELETE /enrollments/{subject_id}
async fn unenroll<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    current: CurrentUser,
    Path(subject_id): Path<i32>,
) -> CatalogResult<impl IntoResponse> {
    service.unenroll_user(current.id, subject_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the caller's active enrollments
///
/// GET /my-courses
async fn my_courses<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    current: CurrentUser,
) -> CatalogResult<Json<Vec<SubjectResponse>>> {
    let subjects = service.my_courses(current.id).await?;
    Ok(Json(subjects))
}
