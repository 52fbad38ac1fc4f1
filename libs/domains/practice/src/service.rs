use chrono::Utc;
use domain_questions::repository::QuestionRepository;
use std::sync::Arc;

use crate::error::{PracticeError, PracticeResult};
use crate::models::{
    AttemptResponse, CompleteSession, CreateAttempt, CreateSession, PracticeSession,
    QuestionAttempt, SessionFilter, SessionResponse, UserStatistics,
};
use crate::repository::PracticeRepository;

/// Service layer for practice business logic.
///
/// Holds the question repository alongside its own: attempt recording
/// reads the question's correct label to freeze correctness at creation.
#[derive(Clone)]
pub struct PracticeService<R: PracticeRepository, Q: QuestionRepository> {
    repository: Arc<R>,
    questions: Arc<Q>,
}

impl<R: PracticeRepository, Q: QuestionRepository> PracticeService<R, Q> {
    pub fn new(repository: R, questions: Q) -> Self {
        Self {
            repository: Arc::new(repository),
            questions: Arc::new(questions),
        }
    }

    /// Open a session against an existing, active subject
    pub async fn start_session(
        &self,
        user_id: i32,
        input: CreateSession,
    ) -> PracticeResult<SessionResponse> {
        if !self.repository.subject_exists(input.subject_id).await? {
            return Err(PracticeError::SubjectNotFound(input.subject_id));
        }

        let session = PracticeSession::new(user_id, input.subject_id, input.total_questions);
        let created = self.repository.create_session(session).await?;
        Ok(created.into())
    }

    /// Record one answered question.
    ///
    /// Correctness is computed here, once, against the question's current
    /// correct label; later edits to the question never rewrite it.
    pub async fn record_attempt(
        &self,
        user_id: i32,
        input: CreateAttempt,
    ) -> PracticeResult<AttemptResponse> {
        let question = self
            .questions
            .get_by_id(input.question_id)
            .await
            .map_err(|e| PracticeError::Database(e.to_string()))?
            .ok_or(PracticeError::QuestionNotFound(input.question_id))?;

        // The session must be the caller's own
        self.repository
            .get_session(input.session_id)
            .await?
            .filter(|s| s.user_id == user_id)
            .ok_or(PracticeError::SessionNotFound(input.session_id))?;

        let attempt = QuestionAttempt {
            id: 0,
            user_id,
            question_id: input.question_id,
            session_id: input.session_id,
            selected_answer: input.selected_answer,
            is_correct: input.selected_answer == question.correct_answer,
            time_taken: input.time_taken,
            attempted_at: Utc::now(),
        };

        let created = self.repository.create_attempt(attempt).await?;
        Ok(created.into())
    }

    /// Store the caller-computed completion summary (write-once; not
    /// recomputed from attempts)
    pub async fn complete_session(
        &self,
        user_id: i32,
        session_id: i32,
        input: CompleteSession,
    ) -> PracticeResult<SessionResponse> {
        let mut session = self
            .repository
            .get_session(session_id)
            .await?
            .filter(|s| s.user_id == user_id)
            .ok_or(PracticeError::SessionNotFound(session_id))?;

        session.score = input.score;
        session.correct_answers = input.correct_answers;
        session.time_taken = input.time_taken;
        session.completed_at = Utc::now();

        let updated = self.repository.update_session(session).await?;
        Ok(updated.into())
    }

    /// The caller's sessions, newest first
    pub async fn my_sessions(
        &self,
        user_id: i32,
        skip: u64,
        limit: u64,
    ) -> PracticeResult<Vec<SessionResponse>> {
        let sessions = self
            .repository
            .list_sessions(SessionFilter {
                user_id: Some(user_id),
                skip,
                limit,
                ..Default::default()
            })
            .await?;

        Ok(sessions.into_iter().map(Into::into).collect())
    }

    /// The caller's attempts, newest first
    pub async fn my_attempts(
        &self,
        user_id: i32,
        skip: u64,
        limit: u64,
    ) -> PracticeResult<Vec<AttemptResponse>> {
        let attempts = self
            .repository
            .list_attempts_by_user(user_id, skip, limit)
            .await?;

        Ok(attempts.into_iter().map(Into::into).collect())
    }

    /// Per-user aggregate statistics; accuracy is exactly 0 when nothing
    /// was attempted
    pub async fn statistics(&self, user_id: i32) -> PracticeResult<UserStatistics> {
        let row = self.repository.user_statistics(user_id).await?;

        let accuracy_rate = if row.attempted > 0 {
            round2(row.correct as f64 / row.attempted as f64 * 100.0)
        } else {
            0.0
        };

        Ok(UserStatistics {
            total_sessions: row.total_sessions,
            average_score: round2(row.average_score),
            total_questions_attempted: row.attempted,
            total_correct_answers: row.correct,
            accuracy_rate,
            subjects_practiced: row.subjects_practiced,
        })
    }

    // Admin console operations

    pub async fn list_sessions(&self, filter: SessionFilter) -> PracticeResult<Vec<SessionResponse>> {
        let sessions = self.repository.list_sessions(filter).await?;
        Ok(sessions.into_iter().map(Into::into).collect())
    }

    pub async fn get_session(&self, id: i32) -> PracticeResult<SessionResponse> {
        let session = self
            .repository
            .get_session(id)
            .await?
            .ok_or(PracticeError::SessionNotFound(id))?;

        Ok(session.into())
    }

    /// Hard-delete a session with its attempts
    pub async fn delete_session(&self, id: i32) -> PracticeResult<()> {
        let deleted = self.repository.hard_delete_session(id).await?;

        if !deleted {
            return Err(PracticeError::SessionNotFound(id));
        }

        Ok(())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryPracticeRepository;
    use domain_questions::{
        AnswerOption, CreateQuestion, Difficulty, InMemoryQuestionRepository, QuestionService,
        UpdateQuestion,
    };

    async fn setup() -> (
        PracticeService<InMemoryPracticeRepository, InMemoryQuestionRepository>,
        QuestionService<InMemoryQuestionRepository>,
        i32,
    ) {
        let practice_repo = InMemoryPracticeRepository::new();
        practice_repo.add_subject(1, "Mathematics").await;

        let question_repo = InMemoryQuestionRepository::new();
        let question_service = QuestionService::new(question_repo.clone());

        let question = question_service
            .create_question(CreateQuestion {
                subject_id: 1,
                question_text: "What is 2 + 2?".to_string(),
                option_a: "3".to_string(),
                option_b: "4".to_string(),
                option_c: "5".to_string(),
                option_d: "6".to_string(),
                correct_answer: AnswerOption::B,
                explanation: None,
                difficulty_level: Difficulty::Easy,
            })
            .await
            .unwrap();

        let service = PracticeService::new(practice_repo, question_repo);
        (service, question_service, question.id)
    }

    #[tokio::test]
    async fn test_start_session_requires_subject() {
        let (service, _, _) = setup().await;

        let result = service
            .start_session(
                7,
                CreateSession {
                    subject_id: 42,
                    total_questions: 10,
                },
            )
            .await;

        assert!(matches!(result, Err(PracticeError::SubjectNotFound(42))));
    }

    #[tokio::test]
    async fn test_attempt_correctness_frozen_at_creation() {
        let (service, questions, question_id) = setup().await;

        let session = service
            .start_session(
                7,
                CreateSession {
                    subject_id: 1,
                    total_questions: 10,
                },
            )
            .await
            .unwrap();

        let attempt = service
            .record_attempt(
                7,
                CreateAttempt {
                    question_id,
                    session_id: session.id,
                    selected_answer: AnswerOption::B,
                    time_taken: 5,
                },
            )
            .await
            .unwrap();

        assert!(attempt.is_correct);

        // Rewriting the question's correct answer must not touch history
        questions
            .update_question(
                question_id,
                UpdateQuestion {
                    correct_answer: Some(AnswerOption::C),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let attempts = service.my_attempts(7, 0, 10).await.unwrap();
        assert_eq!(attempts.len(), 1);
        assert!(attempts[0].is_correct);
    }

    #[tokio::test]
    async fn test_wrong_answer_is_incorrect() {
        let (service, _, question_id) = setup().await;

        let session = service
            .start_session(7, CreateSession { subject_id: 1, total_questions: 10 })
            .await
            .unwrap();

        let attempt = service
            .record_attempt(
                7,
                CreateAttempt {
                    question_id,
                    session_id: session.id,
                    selected_answer: AnswerOption::A,
                    time_taken: 5,
                },
            )
            .await
            .unwrap();

        assert!(!attempt.is_correct);
    }

    #[tokio::test]
    async fn test_attempt_on_foreign_session_rejected() {
        let (service, _, question_id) = setup().await;

        let session = service
            .start_session(7, CreateSession { subject_id: 1, total_questions: 10 })
            .await
            .unwrap();

        let result = service
            .record_attempt(
                8,
                CreateAttempt {
                    question_id,
                    session_id: session.id,
                    selected_answer: AnswerOption::B,
                    time_taken: 5,
                },
            )
            .await;

        assert!(matches!(result, Err(PracticeError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_complete_session_stores_summary_as_given() {
        let (service, _, _) = setup().await;

        let session = service
            .start_session(7, CreateSession { subject_id: 1, total_questions: 10 })
            .await
            .unwrap();

        let completed = service
            .complete_session(
                7,
                session.id,
                CompleteSession {
                    score: 80.0,
                    correct_answers: 8,
                    time_taken: 300,
                },
            )
            .await
            .unwrap();

        assert_eq!(completed.score, 80.0);
        assert_eq!(completed.correct_answers, 8);
        assert_eq!(completed.time_taken, 300);
    }

    #[tokio::test]
    async fn test_statistics_zero_attempts_zero_accuracy() {
        let (service, _, _) = setup().await;

        let stats = service.statistics(7).await.unwrap();
        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.total_questions_attempted, 0);
        assert_eq!(stats.accuracy_rate, 0.0);
        assert!(stats.subjects_practiced.is_empty());
    }

    #[tokio::test]
    async fn test_statistics_aggregates() {
        let (service, _, question_id) = setup().await;

        let session = service
            .start_session(7, CreateSession { subject_id: 1, total_questions: 2 })
            .await
            .unwrap();

        for answer in [AnswerOption::B, AnswerOption::A] {
            service
                .record_attempt(
                    7,
                    CreateAttempt {
                        question_id,
                        session_id: session.id,
                        selected_answer: answer,
                        time_taken: 5,
                    },
                )
                .await
                .unwrap();
        }

        service
            .complete_session(
                7,
                session.id,
                CompleteSession {
                    score: 50.0,
                    correct_answers: 1,
                    time_taken: 60,
                },
            )
            .await
            .unwrap();

        let stats = service.statistics(7).await.unwrap();
        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.average_score, 50.0);
        assert_eq!(stats.total_questions_attempted, 2);
        assert_eq!(stats.total_correct_answers, 1);
        assert_eq!(stats.accuracy_rate, 50.0);
        assert_eq!(stats.subjects_practiced, vec!["Mathematics".to_string()]);
    }

    #[tokio::test]
    async fn test_admin_delete_session_cascades_attempts() {
        let (service, _, question_id) = setup().await;

        let session = service
            .start_session(7, CreateSession { subject_id: 1, total_questions: 1 })
            .await
            .unwrap();

        service
            .record_attempt(
                7,
                CreateAttempt {
                    question_id,
                    session_id: session.id,
                    selected_answer: AnswerOption::B,
                    time_taken: 5,
                },
            )
            .await
            .unwrap();

        service.delete_session(session.id).await.unwrap();

        assert!(service.my_sessions(7, 0, 10).await.unwrap().is_empty());
        assert!(service.my_attempts(7, 0, 10).await.unwrap().is_empty());
    }
}
