use serde::{Deserialize, Serialize};

/// The full JSON dump exchanged by the backup and restore endpoints.
///
/// Table order and field lists are fixed: existing dumps must keep
/// round-tripping. Rows are the raw table records (password hashes
/// included), which is why the endpoints are admin-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupDocument {
    pub users: Vec<domain_users::entity::Model>,
    pub subjects: Vec<domain_catalog::entity::subject::Model>,
    pub questions: Vec<domain_questions::entity::Model>,
    pub practice_sessions: Vec<domain_practice::entity::session::Model>,
    pub question_attempts: Vec<domain_practice::entity::attempt::Model>,
    pub user_enrollments: Vec<domain_catalog::entity::enrollment::Model>,
}

/// Row counts written by a successful restore
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreReport {
    pub users: usize,
    pub subjects: usize,
    pub questions: usize,
    pub practice_sessions: usize,
    pub question_attempts: usize,
    pub user_enrollments: usize,
}

impl RestoreReport {
    pub fn for_document(doc: &BackupDocument) -> Self {
        Self {
            users: doc.users.len(),
            subjects: doc.subjects.len(),
            questions: doc.questions.len(),
            practice_sessions: doc.practice_sessions.len(),
            question_attempts: doc.question_attempts.len(),
            user_enrollments: doc.user_enrollments.len(),
        }
    }
}

/// Platform-wide counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewStats {
    pub total_users: u64,
    pub active_users: u64,
    pub total_subjects: u64,
    pub total_questions: u64,
    pub total_sessions: u64,
    pub total_attempts: u64,
    pub average_score: f64,
}

/// Aggregates grouped by subject
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectStats {
    pub subject_id: i32,
    pub name: String,
    pub question_count: u64,
    pub session_count: u64,
    pub average_score: f64,
}

/// Aggregates grouped by difficulty tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyStats {
    pub difficulty_level: String,
    pub question_count: u64,
    pub attempt_count: u64,
    pub correct_count: u64,
}

/// One day inside a trailing window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStats {
    /// YYYY-MM-DD
    pub day: String,
    pub session_count: u64,
    pub average_score: f64,
}

/// One row of the top-users leaderboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopUserStats {
    pub user_id: i32,
    pub email: String,
    pub full_name: String,
    pub session_count: u64,
    pub average_score: f64,
}

/// Rows removed by the malformed-data sweep
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanupReport {
    /// Users whose email does not parse, removed with their dependents
    pub invalid_email_users: u64,
    /// Attempts whose user, question, or session is gone
    pub orphaned_attempts: u64,
    /// Sessions whose user or subject is gone
    pub orphaned_sessions: u64,
    /// Enrollments whose user or subject is gone
    pub orphaned_enrollments: u64,
}
