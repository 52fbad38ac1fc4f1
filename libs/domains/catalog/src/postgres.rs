use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, Statement, TransactionTrait,
};

use crate::{
    entity::{content, enrollment, lesson, subject},
    error::{CatalogError, CatalogResult},
    models::{Enrollment, Lesson, Subject, SubjectContent, SubjectFilter},
    repository::CatalogRepository,
};

/// PostgreSQL implementation of [`CatalogRepository`]
#[derive(Clone)]
pub struct PgCatalogRepository {
    db: DatabaseConnection,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: impl std::fmt::Display) -> CatalogError {
    CatalogError::Database(e.to_string())
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn create_subject(&self, input: Subject) -> CatalogResult<Subject> {
        let model = subject::insert_model(&input)
            .insert(&self.db)
            .await
            .map_err(db_err)?;

        tracing::info!(subject_id = %model.id, name = %model.name, "Created subject");
        Ok(model.into())
    }

    async fn get_subject(&self, id: i32) -> CatalogResult<Option<Subject>> {
        let model = subject::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(Into::into))
    }

    async fn list_subjects(&self, filter: SubjectFilter) -> CatalogResult<Vec<Subject>> {
        let mut query = subject::Entity::find();

        if let Some(is_active) = filter.is_active {
            query = query.filter(subject::Column::IsActive.eq(is_active));
        }

        let models = query
            .order_by_asc(subject::Column::Id)
            .offset(filter.skip)
            .limit(filter.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_subject(&self, input: Subject) -> CatalogResult<Subject> {
        let model = subject::update_model(&input)
            .update(&self.db)
            .await
            .map_err(db_err)?;

        tracing::info!(subject_id = %model.id, "Updated subject");
        Ok(model.into())
    }

    async fn soft_delete_subject(&self, id: i32) -> CatalogResult<bool> {
        let Some(model) = subject::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(false);
        };

        let mut active: subject::ActiveModel = model.into();
        active.is_active = Set(false);
        active.update(&self.db).await.map_err(db_err)?;

        tracing::info!(subject_id = %id, "Deactivated subject");
        Ok(true)
    }

    async fn hard_delete_subject(&self, id: i32) -> CatalogResult<bool> {
        // No ON DELETE CASCADE on the FKs; take everything down in one
        // transaction, leaves first.
        let txn = self.db.begin().await.map_err(db_err)?;

        for sql in [
            "DELETE FROM question_attempts WHERE question_id IN (SELECT id FROM questions WHERE subject_id = $1)",
            "DELETE FROM question_attempts WHERE session_id IN (SELECT id FROM practice_sessions WHERE subject_id = $1)",
            "DELETE FROM practice_sessions WHERE subject_id = $1",
            "DELETE FROM questions WHERE subject_id = $1",
            "DELETE FROM user_enrollments WHERE subject_id = $1",
            "DELETE FROM lessons WHERE content_id IN (SELECT id FROM subject_contents WHERE subject_id = $1)",
            "DELETE FROM subject_contents WHERE subject_id = $1",
        ] {
            txn.execute_raw(Statement::from_sql_and_values(
                DbBackend::Postgres,
                sql,
                [id.into()],
            ))
            .await
            .map_err(db_err)?;
        }

        let result = subject::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        if result.rows_affected > 0 {
            tracing::info!(subject_id = %id, "Hard-deleted subject and dependents");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn enroll(&self, user_id: i32, subject_id: i32) -> CatalogResult<Enrollment> {
        // Read-then-write idempotency check; the partial unique index on
        // (user_id, subject_id) WHERE is_active backstops concurrent
        // duplicates.
        let existing = enrollment::Entity::find()
            .filter(enrollment::Column::UserId.eq(user_id))
            .filter(enrollment::Column::SubjectId.eq(subject_id))
            .filter(enrollment::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if let Some(model) = existing {
            return Ok(model.into());
        }

        let model = enrollment::insert_model(&Enrollment::new(user_id, subject_id))
            .insert(&self.db)
            .await
            .map_err(db_err)?;

        tracing::info!(user_id = %user_id, subject_id = %subject_id, "Enrolled user");
        Ok(model.into())
    }

    async fn unenroll(&self, user_id: i32, subject_id: i32) -> CatalogResult<bool> {
        let existing = enrollment::Entity::find()
            .filter(enrollment::Column::UserId.eq(user_id))
            .filter(enrollment::Column::SubjectId.eq(subject_id))
            .filter(enrollment::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(model) = existing else {
            return Ok(false);
        };

        let mut active: enrollment::ActiveModel = model.into();
        active.is_active = Set(false);
        active.update(&self.db).await.map_err(db_err)?;

        tracing::info!(user_id = %user_id, subject_id = %subject_id, "Unenrolled user");
        Ok(true)
    }

    async fn enrolled_subjects(&self, user_id: i32) -> CatalogResult<Vec<Subject>> {
        let enrollments = enrollment::Entity::find()
            .filter(enrollment::Column::UserId.eq(user_id))
            .filter(enrollment::Column::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let subject_ids: Vec<i32> = enrollments.iter().map(|e| e.subject_id).collect();
        if subject_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = subject::Entity::find()
            .filter(subject::Column::Id.is_in(subject_ids))
            .filter(subject::Column::IsActive.eq(true))
            .order_by_asc(subject::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn is_enrolled(&self, user_id: i32, subject_id: i32) -> CatalogResult<bool> {
        let found = enrollment::Entity::find()
            .filter(enrollment::Column::UserId.eq(user_id))
            .filter(enrollment::Column::SubjectId.eq(subject_id))
            .filter(enrollment::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(found.is_some())
    }

    async fn create_content(&self, input: SubjectContent) -> CatalogResult<SubjectContent> {
        let model = content::insert_model(&input)
            .insert(&self.db)
            .await
            .map_err(db_err)?;

        tracing::info!(content_id = %model.id, subject_id = %model.subject_id, "Created content");
        Ok(model.into())
    }

    async fn get_content(&self, id: i32) -> CatalogResult<Option<SubjectContent>> {
        let model = content::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(Into::into))
    }

    async fn list_contents(&self, subject_id: i32) -> CatalogResult<Vec<SubjectContent>> {
        let models = content::Entity::find()
            .filter(content::Column::SubjectId.eq(subject_id))
            .order_by_asc(content::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn create_lesson(&self, input: Lesson) -> CatalogResult<Lesson> {
        let model = lesson::insert_model(&input)
            .insert(&self.db)
            .await
            .map_err(db_err)?;

        tracing::info!(lesson_id = %model.id, content_id = %model.content_id, "Created lesson");
        Ok(model.into())
    }

    async fn list_lessons(&self, content_id: i32) -> CatalogResult<Vec<Lesson>> {
        let models = lesson::Entity::find()
            .filter(lesson::Column::ContentId.eq(content_id))
            .order_by_asc(lesson::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}
