use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Statement, TransactionTrait,
};

use crate::{
    entity::{attempt, session},
    error::{PracticeError, PracticeResult},
    models::{PracticeSession, QuestionAttempt, SessionFilter},
    repository::{PracticeRepository, StatisticsRow},
};

/// PostgreSQL implementation of [`PracticeRepository`]
#[derive(Clone)]
pub struct PgPracticeRepository {
    db: DatabaseConnection,
}

impl PgPracticeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: impl std::fmt::Display) -> PracticeError {
    PracticeError::Database(e.to_string())
}

#[async_trait]
impl PracticeRepository for PgPracticeRepository {
    async fn create_session(&self, input: PracticeSession) -> PracticeResult<PracticeSession> {
        let model = session::insert_model(&input)
            .insert(&self.db)
            .await
            .map_err(db_err)?;

        tracing::info!(session_id = %model.id, user_id = %model.user_id, "Created practice session");
        Ok(model.into())
    }

    async fn get_session(&self, id: i32) -> PracticeResult<Option<PracticeSession>> {
        let model = session::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(Into::into))
    }

    async fn list_sessions(&self, filter: SessionFilter) -> PracticeResult<Vec<PracticeSession>> {
        let mut query = session::Entity::find();

        if let Some(user_id) = filter.user_id {
            query = query.filter(session::Column::UserId.eq(user_id));
        }

        if let Some(subject_id) = filter.subject_id {
            query = query.filter(session::Column::SubjectId.eq(subject_id));
        }

        let models = query
            .order_by_desc(session::Column::CompletedAt)
            .offset(filter.skip)
            .limit(filter.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_session(&self, input: PracticeSession) -> PracticeResult<PracticeSession> {
        let model = session::update_model(&input)
            .update(&self.db)
            .await
            .map_err(db_err)?;

        tracing::info!(session_id = %model.id, "Updated practice session");
        Ok(model.into())
    }

    async fn hard_delete_session(&self, id: i32) -> PracticeResult<bool> {
        let txn = self.db.begin().await.map_err(db_err)?;

        attempt::Entity::delete_many()
            .filter(attempt::Column::SessionId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let result = session::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        if result.rows_affected > 0 {
            tracing::info!(session_id = %id, "Hard-deleted session and attempts");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn create_attempt(&self, input: QuestionAttempt) -> PracticeResult<QuestionAttempt> {
        let model = attempt::insert_model(&input)
            .insert(&self.db)
            .await
            .map_err(db_err)?;

        tracing::info!(
            attempt_id = %model.id,
            question_id = %model.question_id,
            is_correct = model.is_correct,
            "Recorded attempt"
        );
        Ok(model.into())
    }

    async fn list_attempts_by_user(
        &self,
        user_id: i32,
        skip: u64,
        limit: u64,
    ) -> PracticeResult<Vec<QuestionAttempt>> {
        let models = attempt::Entity::find()
            .filter(attempt::Column::UserId.eq(user_id))
            .order_by_desc(attempt::Column::AttemptedAt)
            .order_by_desc(attempt::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn subject_exists(&self, subject_id: i32) -> PracticeResult<bool> {
        let row = self
            .db
            .query_one_raw(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "SELECT 1 AS one FROM subjects WHERE id = $1 AND is_active",
                [subject_id.into()],
            ))
            .await
            .map_err(db_err)?;

        Ok(row.is_some())
    }

    async fn user_statistics(&self, user_id: i32) -> PracticeResult<StatisticsRow> {
        // Three aggregate queries, no row iteration
        let session_agg = SessionAgg::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT COUNT(*) AS total_sessions,
                   COALESCE(AVG(score), 0) AS average_score
            FROM practice_sessions
            WHERE user_id = $1
            "#,
            [user_id.into()],
        ))
        .one(&self.db)
        .await
        .map_err(db_err)?
        .unwrap_or_default();

        let attempt_agg = AttemptAgg::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT COUNT(*) AS attempted,
                   COUNT(*) FILTER (WHERE is_correct) AS correct
            FROM question_attempts
            WHERE user_id = $1
            "#,
            [user_id.into()],
        ))
        .one(&self.db)
        .await
        .map_err(db_err)?
        .unwrap_or_default();

        let names = SubjectNameRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT DISTINCT s.name AS name
            FROM subjects s
            JOIN practice_sessions ps ON ps.subject_id = s.id
            WHERE ps.user_id = $1
            ORDER BY s.name
            "#,
            [user_id.into()],
        ))
        .all(&self.db)
        .await
        .map_err(db_err)?;

        Ok(StatisticsRow {
            total_sessions: session_agg.total_sessions.max(0) as u64,
            average_score: session_agg.average_score,
            attempted: attempt_agg.attempted.max(0) as u64,
            correct: attempt_agg.correct.max(0) as u64,
            subjects_practiced: names.into_iter().map(|row| row.name).collect(),
        })
    }
}

#[derive(Debug, Default, FromQueryResult)]
struct SessionAgg {
    total_sessions: i64,
    average_score: f64,
}

#[derive(Debug, Default, FromQueryResult)]
struct AttemptAgg {
    attempted: i64,
    correct: i64,
}

#[derive(Debug, FromQueryResult)]
struct SubjectNameRow {
    name: String,
}
