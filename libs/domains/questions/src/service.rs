use std::sync::Arc;
use validator::Validate;

use crate::error::{QuestionError, QuestionResult};
use crate::models::{
    BulkImportFailure, BulkImportReport, CreateQuestion, Question, QuestionFilter,
    QuestionResponse, QuestionWithAnswer, UpdateQuestion,
};
use crate::repository::QuestionRepository;

/// Service layer for question-bank business logic
#[derive(Clone)]
pub struct QuestionService<R: QuestionRepository> {
    repository: Arc<R>,
}

impl<R: QuestionRepository> QuestionService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn create_question(&self, input: CreateQuestion) -> QuestionResult<QuestionWithAnswer> {
        let question = Question::from_create(input);
        let created = self.repository.create(question).await?;
        Ok(created.into())
    }

    /// Admin view, correct answer included
    pub async fn get_question(&self, id: i32) -> QuestionResult<QuestionWithAnswer> {
        let question = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(QuestionError::NotFound(id))?;

        Ok(question.into())
    }

    pub async fn list_questions(
        &self,
        filter: QuestionFilter,
    ) -> QuestionResult<Vec<QuestionWithAnswer>> {
        let questions = self.repository.list(filter).await?;
        Ok(questions.into_iter().map(Into::into).collect())
    }

    /// Learner view for a practice round: active questions only, correct
    /// answers withheld.
    pub async fn practice_questions(
        &self,
        subject_id: i32,
        limit: u64,
    ) -> QuestionResult<Vec<QuestionResponse>> {
        let questions = self.repository.list_by_subject(subject_id, limit).await?;
        Ok(questions.into_iter().map(Into::into).collect())
    }

    pub async fn update_question(
        &self,
        id: i32,
        input: UpdateQuestion,
    ) -> QuestionResult<QuestionWithAnswer> {
        let mut question = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(QuestionError::NotFound(id))?;

        question.apply_update(input);

        let updated = self.repository.update(question).await?;
        Ok(updated.into())
    }

    pub async fn delete_question(&self, id: i32) -> QuestionResult<()> {
        let deleted = self.repository.soft_delete(id).await?;

        if !deleted {
            return Err(QuestionError::NotFound(id));
        }

        Ok(())
    }

    /// Bulk import with a per-item partial-success contract: every valid
    /// row is committed, every invalid row is reported with its reason.
    /// (Restore, by contrast, is all-or-nothing; the asymmetry is
    /// intentional.)
    pub async fn bulk_import(&self, batch: Vec<CreateQuestion>) -> QuestionResult<BulkImportReport> {
        let mut imported = 0;
        let mut failures = Vec::new();

        for (index, input) in batch.into_iter().enumerate() {
            if let Err(e) = input.validate() {
                failures.push(BulkImportFailure {
                    index,
                    error: e.to_string().replace('\n', "; "),
                });
                continue;
            }

            match self.repository.create(Question::from_create(input)).await {
                Ok(_) => imported += 1,
                Err(e) => failures.push(BulkImportFailure {
                    index,
                    error: e.to_string(),
                }),
            }
        }

        tracing::info!(imported, failed = failures.len(), "Bulk question import");

        Ok(BulkImportReport {
            imported,
            failed: failures.len(),
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerOption, Difficulty};
    use crate::repository::InMemoryQuestionRepository;

    fn service() -> QuestionService<InMemoryQuestionRepository> {
        QuestionService::new(InMemoryQuestionRepository::new())
    }

    fn create_input(subject_id: i32) -> CreateQuestion {
        CreateQuestion {
            subject_id,
            question_text: "What is the derivative of x^2?".to_string(),
            option_a: "x".to_string(),
            option_b: "2x".to_string(),
            option_c: "x^2".to_string(),
            option_d: "2x^2".to_string(),
            correct_answer: AnswerOption::B,
            explanation: Some("Power rule".to_string()),
            difficulty_level: Difficulty::Easy,
        }
    }

    #[tokio::test]
    async fn test_practice_questions_withhold_answer() {
        let service = service();
        service.create_question(create_input(1)).await.unwrap();

        let questions = service.practice_questions(1, 10).await.unwrap();
        assert_eq!(questions.len(), 1);

        // The learner DTO has no correct_answer field at all
        let as_json = serde_json::to_value(&questions[0]).unwrap();
        assert!(as_json.get("correct_answer").is_none());
        assert!(as_json.get("option_b").is_some());
    }

    #[tokio::test]
    async fn test_admin_view_includes_answer() {
        let service = service();
        let created = service.create_question(create_input(1)).await.unwrap();

        let question = service.get_question(created.id).await.unwrap();
        assert_eq!(question.correct_answer, AnswerOption::B);
    }

    #[tokio::test]
    async fn test_bulk_import_partial_success() {
        let service = service();

        let mut bad = create_input(1);
        bad.question_text = String::new();

        let batch = vec![
            create_input(1),
            create_input(1),
            bad,
            create_input(1),
        ];

        let report = service.bulk_import(batch).await.unwrap();
        assert_eq!(report.imported, 3);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].index, 2);
        assert!(!report.failures[0].error.is_empty());

        // The three valid rows are committed
        let all = service
            .list_questions(QuestionFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_missing_question() {
        let service = service();
        let result = service.delete_question(404).await;
        assert!(matches!(result, Err(QuestionError::NotFound(404))));
    }
}
