//! Practice Domain
//!
//! Practice sessions and question attempts. An attempt's correctness is
//! derived once, at creation time, by comparing the selected label with the
//! question's correct label; editing the question later never rewrites
//! history. Session score summaries are write-once values supplied by the
//! completion caller, not recomputed from attempts.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{PracticeError, PracticeResult};
pub use models::{
    AttemptResponse, CompleteSession, CreateAttempt, CreateSession, PracticeSession,
    QuestionAttempt, SessionFilter, SessionResponse, UserStatistics,
};
pub use postgres::PgPracticeRepository;
pub use repository::{InMemoryPracticeRepository, PracticeRepository, StatisticsRow};
pub use service::PracticeService;
