//! Admin System Domain
//!
//! The `/admin/system/*` console: read-only analytics aggregates,
//! backup/restore of the six core tables, and cleanup of malformed rows.
//!
//! Two deliberately different write contracts live here and in the
//! question importer: restore is all-or-nothing (one transaction, any
//! malformed row rolls everything back), while bulk question import
//! commits valid rows and reports failures per item.

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{AdminError, AdminResult};
pub use models::{
    BackupDocument, CleanupReport, DailyStats, DifficultyStats, OverviewStats, RestoreReport,
    SubjectStats, TopUserStats,
};
pub use postgres::PgSystemRepository;
pub use repository::{InMemorySystemRepository, SystemRepository};
pub use service::SystemService;
