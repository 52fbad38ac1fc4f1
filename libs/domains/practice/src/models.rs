use chrono::{DateTime, Utc};
use domain_questions::AnswerOption;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One completed (or in-progress) round of question-answering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeSession {
    pub id: i32,
    pub user_id: i32,
    pub subject_id: i32,
    /// 0-100, written once by the completion caller
    pub score: f64,
    pub total_questions: i32,
    pub correct_answers: i32,
    /// Seconds
    pub time_taken: i32,
    pub completed_at: DateTime<Utc>,
}

impl PracticeSession {
    pub fn new(user_id: i32, subject_id: i32, total_questions: i32) -> Self {
        Self {
            id: 0,
            user_id,
            subject_id,
            score: 0.0,
            total_questions,
            correct_answers: 0,
            time_taken: 0,
            completed_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: i32,
    pub user_id: i32,
    pub subject_id: i32,
    pub score: f64,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub time_taken: i32,
    pub completed_at: DateTime<Utc>,
}

impl From<PracticeSession> for SessionResponse {
    fn from(session: PracticeSession) -> Self {
        Self {
            id: session.id,
            user_id: session.user_id,
            subject_id: session.subject_id,
            score: session.score,
            total_questions: session.total_questions,
            correct_answers: session.correct_answers,
            time_taken: session.time_taken,
            completed_at: session.completed_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSession {
    pub subject_id: i32,
    #[serde(default = "default_total_questions")]
    #[validate(range(min = 1, max = 100))]
    pub total_questions: i32,
}

fn default_total_questions() -> i32 {
    10
}

/// The write-once completion summary. The caller computed these; the
/// service stores them as-is and never recomputes from attempts.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CompleteSession {
    #[validate(range(min = 0.0, max = 100.0))]
    pub score: f64,
    #[validate(range(min = 0))]
    pub correct_answers: i32,
    #[validate(range(min = 0))]
    pub time_taken: i32,
}

/// A single answered question within a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionAttempt {
    pub id: i32,
    pub user_id: i32,
    pub question_id: i32,
    pub session_id: i32,
    pub selected_answer: AnswerOption,
    /// Frozen at creation; never recomputed when the question changes
    pub is_correct: bool,
    pub time_taken: i32,
    pub attempted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptResponse {
    pub id: i32,
    pub user_id: i32,
    pub question_id: i32,
    pub session_id: i32,
    pub selected_answer: AnswerOption,
    pub is_correct: bool,
    pub time_taken: i32,
    pub attempted_at: DateTime<Utc>,
}

impl From<QuestionAttempt> for AttemptResponse {
    fn from(attempt: QuestionAttempt) -> Self {
        Self {
            id: attempt.id,
            user_id: attempt.user_id,
            question_id: attempt.question_id,
            session_id: attempt.session_id,
            selected_answer: attempt.selected_answer,
            is_correct: attempt.is_correct,
            time_taken: attempt.time_taken,
            attempted_at: attempt.attempted_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAttempt {
    pub question_id: i32,
    pub session_id: i32,
    pub selected_answer: AnswerOption,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub time_taken: i32,
}

/// Query filters for listing sessions
#[derive(Debug, Clone, Deserialize)]
pub struct SessionFilter {
    pub user_id: Option<i32>,
    pub subject_id: Option<i32>,
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for SessionFilter {
    fn default() -> Self {
        Self {
            user_id: None,
            subject_id: None,
            skip: 0,
            limit: default_limit(),
        }
    }
}

fn default_limit() -> u64 {
    100
}

/// Per-user aggregate statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatistics {
    pub total_sessions: u64,
    pub average_score: f64,
    pub total_questions_attempted: u64,
    pub total_correct_answers: u64,
    /// correct / attempted x 100; exactly 0 when nothing was attempted
    pub accuracy_rate: f64,
    pub subjects_practiced: Vec<String>,
}
