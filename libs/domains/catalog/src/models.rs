use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Subject (course) entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Subject {
    pub fn new(name: String, description: Option<String>) -> Self {
        Self {
            id: 0,
            name,
            description,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn apply_update(&mut self, update: UpdateSubject) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
    }
}

/// Subject response DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Subject> for SubjectResponse {
    fn from(subject: Subject) -> Self {
        Self {
            id: subject.id,
            name: subject.name,
            description: subject.description,
            is_active: subject.is_active,
            created_at: subject.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSubject {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}

/// Allow-listed mutable fields for subject updates
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateSubject {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Query filters for listing subjects
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectFilter {
    pub is_active: Option<bool>,
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for SubjectFilter {
    fn default() -> Self {
        Self {
            is_active: None,
            skip: 0,
            limit: default_limit(),
        }
    }
}

fn default_limit() -> u64 {
    100
}

/// A user's enrollment in a subject. The active flag distinguishes a
/// current enrollment from a historical one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i32,
    pub user_id: i32,
    pub subject_id: i32,
    pub is_active: bool,
    pub enrolled_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn new(user_id: i32, subject_id: i32) -> Self {
        Self {
            id: 0,
            user_id,
            subject_id,
            is_active: true,
            enrolled_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentResponse {
    pub id: i32,
    pub user_id: i32,
    pub subject_id: i32,
    pub is_active: bool,
    pub enrolled_at: DateTime<Utc>,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            id: enrollment.id,
            user_id: enrollment.user_id,
            subject_id: enrollment.subject_id,
            is_active: enrollment.is_active,
            enrolled_at: enrollment.enrolled_at,
        }
    }
}

/// A block of course material attached to a subject
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectContent {
    pub id: i32,
    pub subject_id: i32,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl SubjectContent {
    pub fn new(subject_id: i32, title: String, body: String) -> Self {
        Self {
            id: 0,
            subject_id,
            title,
            body,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectContentResponse {
    pub id: i32,
    pub subject_id: i32,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<SubjectContent> for SubjectContentResponse {
    fn from(content: SubjectContent) -> Self {
        Self {
            id: content.id,
            subject_id: content.subject_id,
            title: content.title,
            body: content.body,
            created_at: content.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContent {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub body: String,
}

/// A lesson inside a content block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: i32,
    pub content_id: i32,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Lesson {
    pub fn new(content_id: i32, title: String, body: String) -> Self {
        Self {
            id: 0,
            content_id,
            title,
            body,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonResponse {
    pub id: i32,
    pub content_id: i32,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<Lesson> for LessonResponse {
    fn from(lesson: Lesson) -> Self {
        Self {
            id: lesson.id,
            content_id: lesson.content_id,
            title: lesson.title,
            body: lesson.body,
            created_at: lesson.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLesson {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub body: String,
}
