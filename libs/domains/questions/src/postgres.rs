use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::{
    entity,
    error::{QuestionError, QuestionResult},
    models::{Question, QuestionFilter},
    repository::QuestionRepository,
};

/// PostgreSQL implementation of [`QuestionRepository`]
#[derive(Clone)]
pub struct PgQuestionRepository {
    db: DatabaseConnection,
}

impl PgQuestionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: impl std::fmt::Display) -> QuestionError {
    QuestionError::Database(e.to_string())
}

#[async_trait]
impl QuestionRepository for PgQuestionRepository {
    async fn create(&self, question: Question) -> QuestionResult<Question> {
        let model = entity::insert_model(&question)
            .insert(&self.db)
            .await
            .map_err(db_err)?;

        tracing::info!(question_id = %model.id, subject_id = %model.subject_id, "Created question");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> QuestionResult<Option<Question>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(Into::into))
    }

    async fn list(&self, filter: QuestionFilter) -> QuestionResult<Vec<Question>> {
        let mut query = entity::Entity::find();

        if let Some(subject_id) = filter.subject_id {
            query = query.filter(entity::Column::SubjectId.eq(subject_id));
        }

        if let Some(difficulty) = filter.difficulty_level {
            query = query.filter(entity::Column::DifficultyLevel.eq(difficulty));
        }

        if let Some(is_active) = filter.is_active {
            query = query.filter(entity::Column::IsActive.eq(is_active));
        }

        let models = query
            .order_by_asc(entity::Column::Id)
            .offset(filter.skip)
            .limit(filter.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
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
        let model = entity::update_model(&question)
            .update(&self.db)
            .await
            .map_err(db_err)?;

        tracing::info!(question_id = %model.id, "Updated question");
        Ok(model.into())
    }

    async fn soft_delete(&self, id: i32) -> QuestionResult<bool> {
        let Some(model) = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(false);
        };

        let mut active: entity::ActiveModel = model.into();
        active.is_active = Set(false);
        active.update(&self.db).await.map_err(db_err)?;

        tracing::info!(question_id = %id, "Deactivated question");
        Ok(true)
    }
}
