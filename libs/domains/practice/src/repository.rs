use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::PracticeResult;
use crate::models::{PracticeSession, QuestionAttempt, SessionFilter};

/// Raw per-user aggregates, computed by the backend in single aggregate
/// queries rather than row iteration.
#[derive(Debug, Clone, Default)]
pub struct StatisticsRow {
    pub total_sessions: u64,
    pub average_score: f64,
    pub attempted: u64,
    pub correct: u64,
    pub subjects_practiced: Vec<String>,
}

/// Repository trait for practice sessions and attempts
#[async_trait]
pub trait PracticeRepository: Send + Sync {
    async fn create_session(&self, session: PracticeSession) -> PracticeResult<PracticeSession>;
    async fn get_session(&self, id: i32) -> PracticeResult<Option<PracticeSession>>;

    /// Sessions newest-first
    async fn list_sessions(&self, filter: SessionFilter) -> PracticeResult<Vec<PracticeSession>>;

    async fn update_session(&self, session: PracticeSession) -> PracticeResult<PracticeSession>;

    /// Hard delete a session together with its attempts
    async fn hard_delete_session(&self, id: i32) -> PracticeResult<bool>;

    async fn create_attempt(&self, attempt: QuestionAttempt) -> PracticeResult<QuestionAttempt>;

    /// A user's attempts newest-first
    async fn list_attempts_by_user(
        &self,
        user_id: i32,
        skip: u64,
        limit: u64,
    ) -> PracticeResult<Vec<QuestionAttempt>>;

    /// Whether an active subject with this id exists
    async fn subject_exists(&self, subject_id: i32) -> PracticeResult<bool>;

    /// Per-user aggregates for the statistics endpoint
    async fn user_statistics(&self, user_id: i32) -> PracticeResult<StatisticsRow>;
}

/// In-memory implementation of PracticeRepository (for tests and tooling).
///
/// Subject names are registered explicitly since the catalog lives in its
/// own domain.
#[derive(Debug, Clone)]
pub struct InMemoryPracticeRepository {
    sessions: Arc<RwLock<HashMap<i32, PracticeSession>>>,
    attempts: Arc<RwLock<HashMap<i32, QuestionAttempt>>>,
    subjects: Arc<RwLock<HashMap<i32, String>>>,
    next_id: Arc<AtomicI32>,
}

impl InMemoryPracticeRepository {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            attempts: Arc::new(RwLock::new(HashMap::new())),
            subjects: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI32::new(1)),
        }
    }

    /// Register a subject so sessions can reference it
    pub async fn add_subject(&self, id: i32, name: &str) {
        self.subjects.write().await.insert(id, name.to_string());
    }
}

#[async_trait]
impl PracticeRepository for InMemoryPracticeRepository {
    async fn create_session(&self, mut session: PracticeSession) -> PracticeResult<PracticeSession> {
        let mut sessions = self.sessions.write().await;
        session.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        sessions.insert(session.id, session.clone());

        tracing::info!(session_id = %session.id, user_id = %session.user_id, "Created practice session");
        Ok(session)
    }

    async fn get_session(&self, id: i32) -> PracticeResult<Option<PracticeSession>> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn list_sessions(&self, filter: SessionFilter) -> PracticeResult<Vec<PracticeSession>> {
        let sessions = self.sessions.read().await;

        let mut result: Vec<PracticeSession> = sessions
            .values()
            .filter(|s| filter.user_id.is_none_or(|id| s.user_id == id))
            .filter(|s| filter.subject_id.is_none_or(|id| s.subject_id == id))
            .cloned()
            .collect();

        result.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

        Ok(result
            .into_iter()
            .skip(filter.skip as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn update_session(&self, session: PracticeSession) -> PracticeResult<PracticeSession> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn hard_delete_session(&self, id: i32) -> PracticeResult<bool> {
        let mut sessions = self.sessions.write().await;

        if sessions.remove(&id).is_none() {
            return Ok(false);
        }

        self.attempts.write().await.retain(|_, a| a.session_id != id);

        tracing::info!(session_id = %id, "Hard-deleted session and attempts");
        Ok(true)
    }

    async fn create_attempt(&self, mut attempt: QuestionAttempt) -> PracticeResult<QuestionAttempt> {
        let mut attempts = self.attempts.write().await;
        attempt.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        attempts.insert(attempt.id, attempt.clone());

        tracing::info!(
            attempt_id = %attempt.id,
            question_id = %attempt.question_id,
            is_correct = attempt.is_correct,
            "Recorded attempt"
        );
        Ok(attempt)
    }

    async fn list_attempts_by_user(
        &self,
        user_id: i32,
        skip: u64,
        limit: u64,
    ) -> PracticeResult<Vec<QuestionAttempt>> {
        let attempts = self.attempts.read().await;

        let mut result: Vec<QuestionAttempt> = attempts
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();

        result.sort_by(|a, b| b.attempted_at.cmp(&a.attempted_at).then(b.id.cmp(&a.id)));

        Ok(result
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn subject_exists(&self, subject_id: i32) -> PracticeResult<bool> {
        Ok(self.subjects.read().await.contains_key(&subject_id))
    }

    async fn user_statistics(&self, user_id: i32) -> PracticeResult<StatisticsRow> {
        let sessions = self.sessions.read().await;
        let attempts = self.attempts.read().await;
        let subjects = self.subjects.read().await;

        let user_sessions: Vec<&PracticeSession> =
            sessions.values().filter(|s| s.user_id == user_id).collect();

        let total_sessions = user_sessions.len() as u64;
        let average_score = if user_sessions.is_empty() {
            0.0
        } else {
            user_sessions.iter().map(|s| s.score).sum::<f64>() / user_sessions.len() as f64
        };

        let attempted = attempts.values().filter(|a| a.user_id == user_id).count() as u64;
        let correct = attempts
            .values()
            .filter(|a| a.user_id == user_id && a.is_correct)
            .count() as u64;

        let mut names: Vec<String> = user_sessions
            .iter()
            .map(|s| s.subject_id)
            .collect::<HashSet<i32>>()
            .into_iter()
            .filter_map(|id| subjects.get(&id).cloned())
            .collect();
        names.sort();

        Ok(StatisticsRow {
            total_sessions,
            average_score,
            attempted,
            correct,
            subjects_practiced: names,
        })
    }
}
