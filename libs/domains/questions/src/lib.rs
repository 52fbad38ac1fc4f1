//! Questions Domain
//!
//! The multiple-choice question bank: four labeled options, a correct
//! label, an optional explanation, and a difficulty tier. Admin handlers
//! expose CRUD plus a bulk importer with a per-item partial-success
//! contract; the public practice surface reads questions through the
//! repository with the correct answers withheld.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{QuestionError, QuestionResult};
pub use models::{
    AnswerOption, BulkImportReport, CreateQuestion, Difficulty, Question, QuestionFilter,
    QuestionResponse, QuestionWithAnswer, UpdateQuestion,
};
pub use postgres::PgQuestionRepository;
pub use repository::{InMemoryQuestionRepository, QuestionRepository};
pub use service::QuestionService;
