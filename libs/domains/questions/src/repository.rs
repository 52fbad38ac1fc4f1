use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{QuestionError, QuestionResult};
use crate::models::{Question, QuestionFilter};

/// Repository trait for Question persistence
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn create(&self, question: Question) -> QuestionResult<Question>;
    async fn get_by_id(&self, id: i32) -> QuestionResult<Option<Question>>;
    async fn list(&self, filter: QuestionFilter) -> QuestionResult<Vec<Question>>;

    /// Active questions for a subject, capped at `limit`
    async fn list_by_subject(&self, subject_id: i32, limit: u64) -> QuestionResult<Vec<Question>>;

    async fn update(&self, question: Question) -> QuestionResult<Question>;

    /// Soft delete: flip the active flag. Returns false when absent.
    async fn soft_delete(&self, id: i32) -> QuestionResult<bool>;
}

/// In-memory implementation of QuestionRepository (for tests and tooling)
#[derive(Debug, Clone)]
pub struct InMemoryQuestionRepository {
    questions: Arc<RwLock<HashMap<i32, Question>>>,
    next_id: Arc<AtomicI32>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self {
            questions: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI32::new(1)),
        }
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn create(&self, mut question: Question) -> QuestionResult<Question> {
        let mut questions = self.questions.write().await;
        question.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        questions.insert(question.id, question.clone());

        tracing::info!(question_id = %question.id, subject_id = %question.subject_id, "Created question");
        Ok(question)
    }

    async fn get_by_id(&self, id: i32) -> QuestionResult<Option<Question>> {
        Ok(self.questions.read().await.get(&id).cloned())
    }

    async fn list(&self, filter: QuestionFilter) -> QuestionResult<Vec<Question>> {
        let questions = self.questions.read().await;

        let mut result: Vec<Question> = questions
            .values()
            .filter(|q| filter.subject_id.is_none_or(|id| q.subject_id == id))
            .filter(|q| {
                filter
                    .difficulty_level
                    .is_none_or(|d| q.difficulty_level == d)
            })
            .filter(|q| filter.is_active.is_none_or(|active| q.is_active == active))
            .cloned()
            .collect();

        result.sort_by_key(|q| q.id);

        Ok(result
            .into_iter()
            .skip(filter.skip as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn list_by_subject(&self, subject_id: i32, limit: u64) -> QuestionResult<Vec<Question>> {
        self.list(QuestionFilter {
            subject_id: Some(subject_id),
            is_active: Some(true),
            limit,
            ..Default::default()
        })
        .await
    }

    async fn update(&self, question: Question) -> QuestionResult<Question> {
        let mut questions = self.questions.write().await;

        if !questions.contains_key(&question.id) {
            return Err(QuestionError::NotFound(question.id));
        }

        questions.insert(question.id, question.clone());

        tracing::info!(question_id = %question.id, "Updated question");
        Ok(question)
    }

    async fn soft_delete(&self, id: i32) -> QuestionResult<bool> {
        let mut questions = self.questions.write().await;
        match questions.get_mut(&id) {
            Some(question) => {
                question.is_active = false;
                tracing::info!(question_id = %id, "Deactivated question");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerOption, CreateQuestion, Difficulty};
    use test_utils::TestDataBuilder;

    fn question(subject_id: i32, difficulty: Difficulty) -> Question {
        let builder = TestDataBuilder::from_test_name("question_repo");
        Question::from_create(CreateQuestion {
            subject_id,
            question_text: builder.name("question", "arithmetic"),
            option_a: "3".to_string(),
            option_b: "4".to_string(),
            option_c: "5".to_string(),
            option_d: "6".to_string(),
            correct_answer: AnswerOption::B,
            explanation: None,
            difficulty_level: difficulty,
        })
    }

    #[tokio::test]
    async fn test_list_filters_by_subject_and_difficulty() {
        let repo = InMemoryQuestionRepository::new();
        repo.create(question(1, Difficulty::Easy)).await.unwrap();
        repo.create(question(1, Difficulty::Hard)).await.unwrap();
        repo.create(question(2, Difficulty::Easy)).await.unwrap();

        let filtered = repo
            .list(QuestionFilter {
                subject_id: Some(1),
                difficulty_level: Some(Difficulty::Easy),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].subject_id, 1);
    }

    #[tokio::test]
    async fn test_list_by_subject_skips_inactive() {
        let repo = InMemoryQuestionRepository::new();
        let q = repo.create(question(1, Difficulty::Easy)).await.unwrap();
        repo.create(question(1, Difficulty::Easy)).await.unwrap();

        repo.soft_delete(q.id).await.unwrap();

        let active = repo.list_by_subject(1, 10).await.unwrap();
        assert_eq!(active.len(), 1);
    }

    #[tokio::test]
    async fn test_soft_delete_keeps_row() {
        let repo = InMemoryQuestionRepository::new();
        let q = repo.create(question(1, Difficulty::Easy)).await.unwrap();

        assert!(repo.soft_delete(q.id).await.unwrap());

        let row = repo.get_by_id(q.id).await.unwrap().unwrap();
        assert!(!row.is_active);
    }
}
