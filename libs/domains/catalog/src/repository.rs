use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::CatalogResult;
use crate::models::{Enrollment, Lesson, Subject, SubjectContent, SubjectFilter};

/// Repository trait for subjects, enrollments, and course content
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // Subjects
    async fn create_subject(&self, subject: Subject) -> CatalogResult<Subject>;
    async fn get_subject(&self, id: i32) -> CatalogResult<Option<Subject>>;
    async fn list_subjects(&self, filter: SubjectFilter) -> CatalogResult<Vec<Subject>>;
    async fn update_subject(&self, subject: Subject) -> CatalogResult<Subject>;

    /// Soft delete: flip the active flag. Returns false when absent.
    async fn soft_delete_subject(&self, id: i32) -> CatalogResult<bool>;

    /// Hard delete: remove the subject and everything hanging off it
    /// (questions with their attempts, sessions, enrollments, contents,
    /// lessons). Admin-only.
    async fn hard_delete_subject(&self, id: i32) -> CatalogResult<bool>;

    // Enrollments
    /// Idempotent enroll: an existing active (user, subject) row is
    /// returned rather than duplicated.
    async fn enroll(&self, user_id: i32, subject_id: i32) -> CatalogResult<Enrollment>;

    /// Soft unenroll: flip the active flag. Returns false when there is no
    /// active enrollment.
    async fn unenroll(&self, user_id: i32, subject_id: i32) -> CatalogResult<bool>;

    /// Active subjects the user is actively enrolled in
    async fn enrolled_subjects(&self, user_id: i32) -> CatalogResult<Vec<Subject>>;

    async fn is_enrolled(&self, user_id: i32, subject_id: i32) -> CatalogResult<bool>;

    // Course content
    async fn create_content(&self, content: SubjectContent) -> CatalogResult<SubjectContent>;
    async fn get_content(&self, id: i32) -> CatalogResult<Option<SubjectContent>>;
    async fn list_contents(&self, subject_id: i32) -> CatalogResult<Vec<SubjectContent>>;
    async fn create_lesson(&self, lesson: Lesson) -> CatalogResult<Lesson>;
    async fn list_lessons(&self, content_id: i32) -> CatalogResult<Vec<Lesson>>;
}

/// In-memory implementation of CatalogRepository (for tests and tooling)
#[derive(Debug, Clone)]
pub struct InMemoryCatalogRepository {
    subjects: Arc<RwLock<HashMap<i32, Subject>>>,
    enrollments: Arc<RwLock<HashMap<i32, Enrollment>>>,
    contents: Arc<RwLock<HashMap<i32, SubjectContent>>>,
    lessons: Arc<RwLock<HashMap<i32, Lesson>>>,
    next_id: Arc<AtomicI32>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self {
            subjects: Arc::new(RwLock::new(HashMap::new())),
            enrollments: Arc::new(RwLock::new(HashMap::new())),
            contents: Arc::new(RwLock::new(HashMap::new())),
            lessons: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI32::new(1)),
        }
    }

    fn next_id(&self) -> i32 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn create_subject(&self, mut subject: Subject) -> CatalogResult<Subject> {
        let mut subjects = self.subjects.write().await;
        subject.id = self.next_id();
        subjects.insert(subject.id, subject.clone());

        tracing::info!(subject_id = %subject.id, name = %subject.name, "Created subject");
        Ok(subject)
    }

    async fn get_subject(&self, id: i32) -> CatalogResult<Option<Subject>> {
        Ok(self.subjects.read().await.get(&id).cloned())
    }

    async fn list_subjects(&self, filter: SubjectFilter) -> CatalogResult<Vec<Subject>> {
        let subjects = self.subjects.read().await;

        let mut result: Vec<Subject> = subjects
            .values()
            .filter(|s| filter.is_active.is_none_or(|active| s.is_active == active))
            .cloned()
            .collect();

        result.sort_by_key(|s| s.id);

        Ok(result
            .into_iter()
            .skip(filter.skip as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn update_subject(&self, subject: Subject) -> CatalogResult<Subject> {
        let mut subjects = self.subjects.write().await;
        subjects.insert(subject.id, subject.clone());
        Ok(subject)
    }

    async fn soft_delete_subject(&self, id: i32) -> CatalogResult<bool> {
        let mut subjects = self.subjects.write().await;
        match subjects.get_mut(&id) {
            Some(subject) => {
                subject.is_active = false;
                tracing::info!(subject_id = %id, "Deactivated subject");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn hard_delete_subject(&self, id: i32) -> CatalogResult<bool> {
        let mut subjects = self.subjects.write().await;

        if subjects.remove(&id).is_none() {
            return Ok(false);
        }

        self.enrollments
            .write()
            .await
            .retain(|_, e| e.subject_id != id);

        let mut contents = self.contents.write().await;
        let removed: Vec<i32> = contents
            .values()
            .filter(|c| c.subject_id == id)
            .map(|c| c.id)
            .collect();
        contents.retain(|_, c| c.subject_id != id);
        self.lessons
            .write()
            .await
            .retain(|_, l| !removed.contains(&l.content_id));

        tracing::info!(subject_id = %id, "Hard-deleted subject");
        Ok(true)
    }

    async fn enroll(&self, user_id: i32, subject_id: i32) -> CatalogResult<Enrollment> {
        let mut enrollments = self.enrollments.write().await;

        // Idempotent: hand back the existing active row
        if let Some(existing) = enrollments
            .values()
            .find(|e| e.user_id == user_id && e.subject_id == subject_id && e.is_active)
        {
            return Ok(existing.clone());
        }

        let mut enrollment = Enrollment::new(user_id, subject_id);
        enrollment.id = self.next_id();
        enrollments.insert(enrollment.id, enrollment.clone());

        tracing::info!(user_id = %user_id, subject_id = %subject_id, "Enrolled user");
        Ok(enrollment)
    }

    async fn unenroll(&self, user_id: i32, subject_id: i32) -> CatalogResult<bool> {
        let mut enrollments = self.enrollments.write().await;

        let active = enrollments
            .values_mut()
            .find(|e| e.user_id == user_id && e.subject_id == subject_id && e.is_active);

        match active {
            Some(enrollment) => {
                enrollment.is_active = false;
                tracing::info!(user_id = %user_id, subject_id = %subject_id, "Unenrolled user");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn enrolled_subjects(&self, user_id: i32) -> CatalogResult<Vec<Subject>> {
        let enrollments = self.enrollments.read().await;
        let subjects = self.subjects.read().await;

        let mut result: Vec<Subject> = enrollments
            .values()
            .filter(|e| e.user_id == user_id && e.is_active)
            .filter_map(|e| subjects.get(&e.subject_id))
            .filter(|s| s.is_active)
            .cloned()
            .collect();

        result.sort_by_key(|s| s.id);
        Ok(result)
    }

    async fn is_enrolled(&self, user_id: i32, subject_id: i32) -> CatalogResult<bool> {
        let enrollments = self.enrollments.read().await;
        Ok(enrollments
            .values()
            .any(|e| e.user_id == user_id && e.subject_id == subject_id && e.is_active))
    }

    async fn create_content(&self, mut content: SubjectContent) -> CatalogResult<SubjectContent> {
        let mut contents = self.contents.write().await;
        content.id = self.next_id();
        contents.insert(content.id, content.clone());
        Ok(content)
    }

    async fn get_content(&self, id: i32) -> CatalogResult<Option<SubjectContent>> {
        Ok(self.contents.read().await.get(&id).cloned())
    }

    async fn list_contents(&self, subject_id: i32) -> CatalogResult<Vec<SubjectContent>> {
        let contents = self.contents.read().await;
        let mut result: Vec<SubjectContent> = contents
            .values()
            .filter(|c| c.subject_id == subject_id)
            .cloned()
            .collect();
        result.sort_by_key(|c| c.id);
        Ok(result)
    }

    async fn create_lesson(&self, mut lesson: Lesson) -> CatalogResult<Lesson> {
        let mut lessons = self.lessons.write().await;
        lesson.id = self.next_id();
        lessons.insert(lesson.id, lesson.clone());
        Ok(lesson)
    }

    async fn list_lessons(&self, content_id: i32) -> CatalogResult<Vec<Lesson>> {
        let lessons = self.lessons.read().await;
        let mut result: Vec<Lesson> = lessons
            .values()
            .filter(|l| l.content_id == content_id)
            .cloned()
            .collect();
        result.sort_by_key(|l| l.id);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::TestDataBuilder;

    fn subject(name: &str) -> Subject {
        Subject::new(name.to_string(), None)
    }

    #[tokio::test]
    async fn test_enroll_is_idempotent() {
        let repo = InMemoryCatalogRepository::new();
        let builder = TestDataBuilder::from_test_name("enroll_is_idempotent");
        let s = repo
            .create_subject(subject(&builder.subject_name("math")))
            .await
            .unwrap();

        let first = repo.enroll(7, s.id).await.unwrap();
        let second = repo.enroll(7, s.id).await.unwrap();

        assert_eq!(first.id, second.id);

        // Exactly one active row for the pair
        let enrollments = repo.enrollments.read().await;
        let active = enrollments
            .values()
            .filter(|e| e.user_id == 7 && e.subject_id == s.id && e.is_active)
            .count();
        assert_eq!(active, 1);
    }

    #[tokio::test]
    async fn test_unenroll_flips_flag_without_deleting() {
        let repo = InMemoryCatalogRepository::new();
        let s = repo.create_subject(subject("Math")).await.unwrap();
        repo.enroll(7, s.id).await.unwrap();

        assert!(repo.unenroll(7, s.id).await.unwrap());

        // The row still exists, inactive
        let enrollments = repo.enrollments.read().await;
        assert_eq!(enrollments.len(), 1);
        assert!(enrollments.values().all(|e| !e.is_active));
    }

    #[tokio::test]
    async fn test_unenroll_without_enrollment_returns_false() {
        let repo = InMemoryCatalogRepository::new();
        let s = repo.create_subject(subject("Math")).await.unwrap();

        assert!(!repo.unenroll(7, s.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_reenroll_after_unenroll_creates_new_active_row() {
        let repo = InMemoryCatalogRepository::new();
        let s = repo.create_subject(subject("Math")).await.unwrap();

        let first = repo.enroll(7, s.id).await.unwrap();
        repo.unenroll(7, s.id).await.unwrap();
        let second = repo.enroll(7, s.id).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(repo.is_enrolled(7, s.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_enrolled_subjects_hides_inactive_subject() {
        let repo = InMemoryCatalogRepository::new();
        let s = repo.create_subject(subject("Math")).await.unwrap();
        repo.enroll(7, s.id).await.unwrap();

        assert_eq!(repo.enrolled_subjects(7).await.unwrap().len(), 1);

        repo.soft_delete_subject(s.id).await.unwrap();
        assert!(repo.enrolled_subjects(7).await.unwrap().is_empty());
    }
}
