use std::sync::Arc;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    CreateContent, CreateLesson, CreateSubject, EnrollmentResponse, Lesson, LessonResponse,
    Subject, SubjectContent, SubjectContentResponse, SubjectFilter, SubjectResponse, UpdateSubject,
};
use crate::repository::CatalogRepository;

/// Service layer for catalog business logic
#[derive(Clone)]
pub struct CatalogService<R: CatalogRepository> {
    repository: Arc<R>,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn create_subject(&self, input: CreateSubject) -> CatalogResult<SubjectResponse> {
        let subject = Subject::new(input.name, input.description);
        let created = self.repository.create_subject(subject).await?;
        Ok(created.into())
    }

    pub async fn get_subject(&self, id: i32) -> CatalogResult<SubjectResponse> {
        let subject = self
            .repository
            .get_subject(id)
            .await?
            .ok_or(CatalogError::SubjectNotFound(id))?;

        Ok(subject.into())
    }

    /// Admin listing: every subject, optionally filtered by active flag
    pub async fn list_subjects(&self, filter: SubjectFilter) -> CatalogResult<Vec<SubjectResponse>> {
        let subjects = self.repository.list_subjects(filter).await?;
        Ok(subjects.into_iter().map(Into::into).collect())
    }

    /// Public course catalog: active subjects only
    pub async fn list_active_subjects(&self) -> CatalogResult<Vec<SubjectResponse>> {
        self.list_subjects(SubjectFilter {
            is_active: Some(true),
            ..Default::default()
        })
        .await
    }

    pub async fn update_subject(
        &self,
        id: i32,
        input: UpdateSubject,
    ) -> CatalogResult<SubjectResponse> {
        let mut subject = self
            .repository
            .get_subject(id)
            .await?
            .ok_or(CatalogError::SubjectNotFound(id))?;

        subject.apply_update(input);

        let updated = self.repository.update_subject(subject).await?;
        Ok(updated.into())
    }

    /// Soft delete by default; `hard` removes the subject and everything
    /// hanging off it.
    pub async fn delete_subject(&self, id: i32, hard: bool) -> CatalogResult<()> {
        let deleted = if hard {
            self.repository.hard_delete_subject(id).await?
        } else {
            self.repository.soft_delete_subject(id).await?
        };

        if !deleted {
            return Err(CatalogError::SubjectNotFound(id));
        }

        Ok(())
    }

    /// Enroll a user in a subject (idempotent).
    ///
    /// The subject must exist and be active; enrolling in a retired course
    /// reads as not-found, matching the public catalog.
    pub async fn enroll_user(
        &self,
        user_id: i32,
        subject_id: i32,
    ) -> CatalogResult<EnrollmentResponse> {
        let subject = self
            .repository
            .get_subject(subject_id)
            .await?
            .filter(|s| s.is_active)
            .ok_or(CatalogError::SubjectNotFound(subject_id))?;

        let enrollment = self.repository.enroll(user_id, subject.id).await?;
        Ok(enrollment.into())
    }

    pub async fn unenroll_user(&self, user_id: i32, subject_id: i32) -> CatalogResult<()> {
        let unenrolled = self.repository.unenroll(user_id, subject_id).await?;

        if !unenrolled {
            return Err(CatalogError::NotEnrolled(subject_id));
        }

        Ok(())
    }

    pub async fn my_courses(&self, user_id: i32) -> CatalogResult<Vec<SubjectResponse>> {
        let subjects = self.repository.enrolled_subjects(user_id).await?;
        Ok(subjects.into_iter().map(Into::into).collect())
    }

    pub async fn add_content(
        &self,
        subject_id: i32,
        input: CreateContent,
    ) -> CatalogResult<SubjectContentResponse> {
        self.repository
            .get_subject(subject_id)
            .await?
            .ok_or(CatalogError::SubjectNotFound(subject_id))?;

        let content = SubjectContent::new(subject_id, input.title, input.body);
        let created = self.repository.create_content(content).await?;
        Ok(created.into())
    }

    pub async fn list_contents(
        &self,
        subject_id: i32,
    ) -> CatalogResult<Vec<SubjectContentResponse>> {
        self.repository
            .get_subject(subject_id)
            .await?
            .ok_or(CatalogError::SubjectNotFound(subject_id))?;

        let contents = self.repository.list_contents(subject_id).await?;
        Ok(contents.into_iter().map(Into::into).collect())
    }

    pub async fn add_lesson(
        &self,
        content_id: i32,
        input: CreateLesson,
    ) -> CatalogResult<LessonResponse> {
        self.repository
            .get_content(content_id)
            .await?
            .ok_or(CatalogError::ContentNotFound(content_id))?;

        let lesson = Lesson::new(content_id, input.title, input.body);
        let created = self.repository.create_lesson(lesson).await?;
        Ok(created.into())
    }

    pub async fn list_lessons(&self, content_id: i32) -> CatalogResult<Vec<LessonResponse>> {
        self.repository
            .get_content(content_id)
            .await?
            .ok_or(CatalogError::ContentNotFound(content_id))?;

        let lessons = self.repository.list_lessons(content_id).await?;
        Ok(lessons.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryCatalogRepository;

    fn service() -> CatalogService<InMemoryCatalogRepository> {
        CatalogService::new(InMemoryCatalogRepository::new())
    }

    async fn make_subject(service: &CatalogService<InMemoryCatalogRepository>) -> SubjectResponse {
        service
            .create_subject(CreateSubject {
                name: "Mathematics".to_string(),
                description: Some("Algebra and calculus".to_string()),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_public_catalog_hides_inactive() {
        let service = service();
        let subject = make_subject(&service).await;
        make_subject(&service).await;

        service.delete_subject(subject.id, false).await.unwrap();

        let active = service.list_active_subjects().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_ne!(active[0].id, subject.id);
    }

    #[tokio::test]
    async fn test_enroll_requires_active_subject() {
        let service = service();
        let subject = make_subject(&service).await;

        service.delete_subject(subject.id, false).await.unwrap();

        let result = service.enroll_user(1, subject.id).await;
        assert!(matches!(result, Err(CatalogError::SubjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_enroll_twice_returns_same_enrollment() {
        let service = service();
        let subject = make_subject(&service).await;

        let first = service.enroll_user(1, subject.id).await.unwrap();
        let second = service.enroll_user(1, subject.id).await.unwrap();

        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_unenroll_unenrolled_is_error() {
        let service = service();
        let subject = make_subject(&service).await;

        let result = service.unenroll_user(1, subject.id).await;
        assert!(matches!(result, Err(CatalogError::NotEnrolled(_))));
    }

    #[tokio::test]
    async fn test_my_courses_reflects_enrollment_lifecycle() {
        let service = service();
        let subject = make_subject(&service).await;

        assert!(service.my_courses(1).await.unwrap().is_empty());

        service.enroll_user(1, subject.id).await.unwrap();
        assert_eq!(service.my_courses(1).await.unwrap().len(), 1);

        service.unenroll_user(1, subject.id).await.unwrap();
        assert!(service.my_courses(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_content_requires_subject() {
        let service = service();

        let result = service
            .add_content(
                99,
                CreateContent {
                    title: "Intro".to_string(),
                    body: "Welcome".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(CatalogError::SubjectNotFound(99))));
    }

    #[tokio::test]
    async fn test_lesson_tree() {
        let service = service();
        let subject = make_subject(&service).await;

        let content = service
            .add_content(
                subject.id,
                CreateContent {
                    title: "Unit 1".to_string(),
                    body: "Outline".to_string(),
                },
            )
            .await
            .unwrap();

        service
            .add_lesson(
                content.id,
                CreateLesson {
                    title: "Lesson 1".to_string(),
                    body: "Content".to_string(),
                },
            )
            .await
            .unwrap();

        let lessons = service.list_lessons(content.id).await.unwrap();
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].title, "Lesson 1");
    }

    #[tokio::test]
    async fn test_hard_delete_subject() {
        let service = service();
        let subject = make_subject(&service).await;
        service.enroll_user(1, subject.id).await.unwrap();

        service.delete_subject(subject.id, true).await.unwrap();

        let result = service.get_subject(subject.id).await;
        assert!(matches!(result, Err(CatalogError::SubjectNotFound(_))));
    }
}
