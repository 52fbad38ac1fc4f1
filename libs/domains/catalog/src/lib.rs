//! Catalog Domain
//!
//! Subjects (courses), user enrollments, and the course content tree
//! (contents and lessons). Same layered anatomy as the other domains:
//! handlers over a service over a repository trait with in-memory and
//! Postgres implementations.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use models::{
    CreateContent, CreateLesson, CreateSubject, Enrollment, EnrollmentResponse, Lesson,
    LessonResponse, Subject, SubjectContent, SubjectContentResponse, SubjectFilter,
    SubjectResponse, UpdateSubject,
};
pub use postgres::PgCatalogRepository;
pub use repository::{CatalogRepository, InMemoryCatalogRepository};
pub use service::CatalogService;
