use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::AdminResult;
use crate::models::{
    BackupDocument, CleanupReport, DailyStats, DifficultyStats, OverviewStats, SubjectStats,
    TopUserStats,
};

/// Repository trait for the system console: analytics aggregates over the
/// whole datastore, full-dump backup, replace-all restore, and the
/// malformed-row sweep.
#[async_trait]
pub trait SystemRepository: Send + Sync {
    /// Full dump of the six core tables
    async fn snapshot(&self) -> AdminResult<BackupDocument>;

    /// Replace-all restore. All-or-nothing: any failing row leaves the
    /// pre-restore state intact.
    async fn restore(&self, document: BackupDocument) -> AdminResult<()>;

    async fn overview(&self) -> AdminResult<OverviewStats>;
    async fn by_subject(&self) -> AdminResult<Vec<SubjectStats>>;
    async fn by_difficulty(&self) -> AdminResult<Vec<DifficultyStats>>;

    /// Daily session counts/means over the trailing `days` window,
    /// relative to wall-clock now
    async fn daily(&self, days: u32) -> AdminResult<Vec<DailyStats>>;

    /// Top users by mean score
    async fn top_users(&self, limit: u64) -> AdminResult<Vec<TopUserStats>>;

    /// Hard-delete malformed rows and report what went
    async fn cleanup(&self) -> AdminResult<CleanupReport>;
}

/// In-memory implementation of [`SystemRepository`] (for tests and
/// tooling). State is a [`BackupDocument`] behind a lock; restore swaps it
/// wholesale, which makes the all-or-nothing contract trivial.
#[derive(Debug, Default, Clone)]
pub struct InMemorySystemRepository {
    state: Arc<RwLock<BackupDocument>>,
}

impl InMemorySystemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(document: BackupDocument) -> Self {
        Self {
            state: Arc::new(RwLock::new(document)),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

#[async_trait]
impl SystemRepository for InMemorySystemRepository {
    async fn snapshot(&self) -> AdminResult<BackupDocument> {
        Ok(self.state.read().await.clone())
    }

    async fn restore(&self, document: BackupDocument) -> AdminResult<()> {
        *self.state.write().await = document;
        Ok(())
    }

    async fn overview(&self) -> AdminResult<OverviewStats> {
        let state = self.state.read().await;

        let scores: Vec<f64> = state.practice_sessions.iter().map(|s| s.score).collect();

        Ok(OverviewStats {
            total_users: state.users.len() as u64,
            active_users: state.users.iter().filter(|u| u.is_active).count() as u64,
            total_subjects: state.subjects.len() as u64,
            total_questions: state.questions.len() as u64,
            total_sessions: state.practice_sessions.len() as u64,
            total_attempts: state.question_attempts.len() as u64,
            average_score: round2(mean(&scores)),
        })
    }

    async fn by_subject(&self) -> AdminResult<Vec<SubjectStats>> {
        let state = self.state.read().await;

        let mut result: Vec<SubjectStats> = state
            .subjects
            .iter()
            .map(|subject| {
                let question_count = state
                    .questions
                    .iter()
                    .filter(|q| q.subject_id == subject.id)
                    .count() as u64;

                let scores: Vec<f64> = state
                    .practice_sessions
                    .iter()
                    .filter(|s| s.subject_id == subject.id)
                    .map(|s| s.score)
                    .collect();

                SubjectStats {
                    subject_id: subject.id,
                    name: subject.name.clone(),
                    question_count,
                    session_count: scores.len() as u64,
                    average_score: round2(mean(&scores)),
                }
            })
            .collect();

        result.sort_by_key(|s| s.subject_id);
        Ok(result)
    }

    async fn by_difficulty(&self) -> AdminResult<Vec<DifficultyStats>> {
        let state = self.state.read().await;

        let mut result = Vec::new();
        for difficulty in ["easy", "medium", "hard"] {
            let question_ids: HashSet<i32> = state
                .questions
                .iter()
                .filter(|q| q.difficulty_level.to_string() == difficulty)
                .map(|q| q.id)
                .collect();

            let attempts: Vec<_> = state
                .question_attempts
                .iter()
                .filter(|a| question_ids.contains(&a.question_id))
                .collect();

            result.push(DifficultyStats {
                difficulty_level: difficulty.to_string(),
                question_count: question_ids.len() as u64,
                attempt_count: attempts.len() as u64,
                correct_count: attempts.iter().filter(|a| a.is_correct).count() as u64,
            });
        }

        Ok(result)
    }

    async fn daily(&self, days: u32) -> AdminResult<Vec<DailyStats>> {
        let state = self.state.read().await;
        let cutoff = Utc::now() - Duration::days(i64::from(days));

        let mut buckets: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for session in &state.practice_sessions {
            let completed: chrono::DateTime<Utc> = session.completed_at.into();
            if completed >= cutoff {
                buckets
                    .entry(completed.format("%Y-%m-%d").to_string())
                    .or_default()
                    .push(session.score);
            }
        }

        Ok(buckets
            .into_iter()
            .map(|(day, scores)| DailyStats {
                day,
                session_count: scores.len() as u64,
                average_score: round2(mean(&scores)),
            })
            .collect())
    }

    async fn top_users(&self, limit: u64) -> AdminResult<Vec<TopUserStats>> {
        let state = self.state.read().await;

        let mut rows: Vec<TopUserStats> = state
            .users
            .iter()
            .filter_map(|user| {
                let scores: Vec<f64> = state
                    .practice_sessions
                    .iter()
                    .filter(|s| s.user_id == user.id)
                    .map(|s| s.score)
                    .collect();

                if scores.is_empty() {
                    return None;
                }

                Some(TopUserStats {
                    user_id: user.id,
                    email: user.email.clone(),
                    full_name: user.full_name.clone(),
                    session_count: scores.len() as u64,
                    average_score: round2(mean(&scores)),
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            b.average_score
                .partial_cmp(&a.average_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows.truncate(limit as usize);

        Ok(rows)
    }

    async fn cleanup(&self) -> AdminResult<CleanupReport> {
        let mut state = self.state.write().await;
        let mut report = CleanupReport::default();

        // Users whose email does not parse, plus everything they own
        let bad_users: HashSet<i32> = state
            .users
            .iter()
            .filter(|u| !crate::service::email_is_valid(&u.email))
            .map(|u| u.id)
            .collect();

        report.invalid_email_users = bad_users.len() as u64;
        state.users.retain(|u| !bad_users.contains(&u.id));
        state
            .practice_sessions
            .retain(|s| !bad_users.contains(&s.user_id));
        state
            .question_attempts
            .retain(|a| !bad_users.contains(&a.user_id));
        state
            .user_enrollments
            .retain(|e| !bad_users.contains(&e.user_id));

        // Orphaned sessions, then attempts against what is left
        let user_ids: HashSet<i32> = state.users.iter().map(|u| u.id).collect();
        let subject_ids: HashSet<i32> = state.subjects.iter().map(|s| s.id).collect();

        let before = state.practice_sessions.len();
        state
            .practice_sessions
            .retain(|s| user_ids.contains(&s.user_id) && subject_ids.contains(&s.subject_id));
        report.orphaned_sessions = (before - state.practice_sessions.len()) as u64;

        let session_ids: HashSet<i32> = state.practice_sessions.iter().map(|s| s.id).collect();
        let question_ids: HashSet<i32> = state.questions.iter().map(|q| q.id).collect();

        let before = state.question_attempts.len();
        state.question_attempts.retain(|a| {
            user_ids.contains(&a.user_id)
                && session_ids.contains(&a.session_id)
                && question_ids.contains(&a.question_id)
        });
        report.orphaned_attempts = (before - state.question_attempts.len()) as u64;

        let before = state.user_enrollments.len();
        state
            .user_enrollments
            .retain(|e| user_ids.contains(&e.user_id) && subject_ids.contains(&e.subject_id));
        report.orphaned_enrollments = (before - state.user_enrollments.len()) as u64;

        Ok(report)
    }
}
