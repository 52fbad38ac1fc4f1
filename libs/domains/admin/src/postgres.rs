use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr, EntityTrait,
    FromQueryResult, IntoActiveModel, QueryOrder, Statement, TransactionTrait,
};

use crate::error::{AdminError, AdminResult};
use crate::models::{
    BackupDocument, CleanupReport, DailyStats, DifficultyStats, OverviewStats, SubjectStats,
    TopUserStats,
};
use crate::repository::SystemRepository;

use domain_catalog::entity::{enrollment, subject};
use domain_practice::entity::{attempt, session};
use domain_questions::entity as question;
use domain_users::entity as user;

/// PostgreSQL implementation of [`SystemRepository`]
#[derive(Clone)]
pub struct PgSystemRepository {
    db: DatabaseConnection,
}

impl PgSystemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: impl std::fmt::Display) -> AdminError {
    AdminError::Database(e.to_string())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Postgres-side approximation of the email check used by the restore
/// validator; precise parsing happens at the API boundary.
const INVALID_EMAIL_PREDICATE: &str =
    r"email !~ '^[^@[:space:]]+@[^@[:space:]]+\.[^@[:space:]]+$'";

async fn exec_count(txn: &DatabaseTransaction, sql: &str) -> Result<u64, DbErr> {
    let result = txn
        .execute_raw(Statement::from_string(DbBackend::Postgres, sql.to_string()))
        .await?;
    Ok(result.rows_affected())
}

#[derive(Debug, Default, FromQueryResult)]
struct OverviewRow {
    total_users: i64,
    active_users: i64,
    total_subjects: i64,
    total_questions: i64,
    total_sessions: i64,
    total_attempts: i64,
    average_score: f64,
}

#[derive(Debug, FromQueryResult)]
struct SubjectRow {
    subject_id: i32,
    name: String,
    question_count: i64,
    session_count: i64,
    average_score: f64,
}

#[derive(Debug, FromQueryResult)]
struct DifficultyRow {
    difficulty_level: String,
    question_count: i64,
    attempt_count: i64,
    correct_count: i64,
}

#[derive(Debug, FromQueryResult)]
struct DailyRow {
    day: String,
    session_count: i64,
    average_score: f64,
}

#[derive(Debug, FromQueryResult)]
struct TopUserRow {
    user_id: i32,
    email: String,
    full_name: String,
    session_count: i64,
    average_score: f64,
}

#[async_trait]
impl SystemRepository for PgSystemRepository {
    async fn snapshot(&self) -> AdminResult<BackupDocument> {
        let users = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let subjects = subject::Entity::find()
            .order_by_asc(subject::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let questions = question::Entity::find()
            .order_by_asc(question::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let practice_sessions = session::Entity::find()
            .order_by_asc(session::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let question_attempts = attempt::Entity::find()
            .order_by_asc(attempt::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let user_enrollments = enrollment::Entity::find()
            .order_by_asc(enrollment::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(BackupDocument {
            users,
            subjects,
            questions,
            practice_sessions,
            question_attempts,
            user_enrollments,
        })
    }

    async fn restore(&self, document: BackupDocument) -> AdminResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AdminError::RestoreFailed(e.to_string()))?;

        let result: Result<(), DbErr> = async {
            // Clear everything, leaves first. The content tree hangs off
            // subjects and is not part of the dump, so it goes too.
            for table in [
                "question_attempts",
                "practice_sessions",
                "user_enrollments",
                "questions",
                "lessons",
                "subject_contents",
                "subjects",
                "users",
            ] {
                txn.execute_raw(Statement::from_string(
                    DbBackend::Postgres,
                    format!("DELETE FROM {}", table),
                ))
                .await?;
            }

            if !document.users.is_empty() {
                user::Entity::insert_many(
                    document.users.iter().cloned().map(IntoActiveModel::into_active_model),
                )
                .exec(&txn)
                .await?;
            }
            if !document.subjects.is_empty() {
                subject::Entity::insert_many(
                    document.subjects.iter().cloned().map(IntoActiveModel::into_active_model),
                )
                .exec(&txn)
                .await?;
            }
            if !document.questions.is_empty() {
                question::Entity::insert_many(
                    document.questions.iter().cloned().map(IntoActiveModel::into_active_model),
                )
                .exec(&txn)
                .await?;
            }
            if !document.practice_sessions.is_empty() {
                session::Entity::insert_many(
                    document
                        .practice_sessions
                        .iter()
                        .cloned()
                        .map(IntoActiveModel::into_active_model),
                )
                .exec(&txn)
                .await?;
            }
            if !document.question_attempts.is_empty() {
                attempt::Entity::insert_many(
                    document
                        .question_attempts
                        .iter()
                        .cloned()
                        .map(IntoActiveModel::into_active_model),
                )
                .exec(&txn)
                .await?;
            }
            if !document.user_enrollments.is_empty() {
                enrollment::Entity::insert_many(
                    document
                        .user_enrollments
                        .iter()
                        .cloned()
                        .map(IntoActiveModel::into_active_model),
                )
                .exec(&txn)
                .await?;
            }

            // The dump carries explicit ids; bump the serial sequences
            // past them so new inserts don't collide.
            for table in [
                "users",
                "subjects",
                "questions",
                "practice_sessions",
                "question_attempts",
                "user_enrollments",
            ] {
                txn.execute_raw(Statement::from_string(
                    DbBackend::Postgres,
                    format!(
                        "SELECT setval(pg_get_serial_sequence('{table}', 'id'), \
                         COALESCE((SELECT MAX(id) FROM {table}), 0) + 1, false)",
                    ),
                ))
                .await?;
            }

            Ok(())
        }
        .await;

        match result {
            Ok(()) => {
                txn.commit()
                    .await
                    .map_err(|e| AdminError::RestoreFailed(e.to_string()))?;
                Ok(())
            }
            Err(e) => {
                // Roll back on any failing row; prior committed state stays
                let _ = txn.rollback().await;
                Err(AdminError::RestoreFailed(e.to_string()))
            }
        }
    }

    async fn overview(&self) -> AdminResult<OverviewStats> {
        let row = OverviewRow::find_by_statement(Statement::from_string(
            DbBackend::Postgres,
            r#"
            SELECT (SELECT COUNT(*) FROM users) AS total_users,
                   (SELECT COUNT(*) FROM users WHERE is_active) AS active_users,
                   (SELECT COUNT(*) FROM subjects) AS total_subjects,
                   (SELECT COUNT(*) FROM questions) AS total_questions,
                   (SELECT COUNT(*) FROM practice_sessions) AS total_sessions,
                   (SELECT COUNT(*) FROM question_attempts) AS total_attempts,
                   (SELECT COALESCE(AVG(score), 0) FROM practice_sessions) AS average_score
            "#
            .to_string(),
        ))
        .one(&self.db)
        .await
        .map_err(db_err)?
        .unwrap_or_default();

        Ok(OverviewStats {
            total_users: row.total_users.max(0) as u64,
            active_users: row.active_users.max(0) as u64,
            total_subjects: row.total_subjects.max(0) as u64,
            total_questions: row.total_questions.max(0) as u64,
            total_sessions: row.total_sessions.max(0) as u64,
            total_attempts: row.total_attempts.max(0) as u64,
            average_score: round2(row.average_score),
        })
    }

    async fn by_subject(&self) -> AdminResult<Vec<SubjectStats>> {
        let rows = SubjectRow::find_by_statement(Statement::from_string(
            DbBackend::Postgres,
            r#"
            SELECT s.id AS subject_id,
                   s.name AS name,
                   (SELECT COUNT(*) FROM questions q
                    WHERE q.subject_id = s.id) AS question_count,
                   (SELECT COUNT(*) FROM practice_sessions ps
                    WHERE ps.subject_id = s.id) AS session_count,
                   (SELECT COALESCE(AVG(ps.score), 0) FROM practice_sessions ps
                    WHERE ps.subject_id = s.id) AS average_score
            FROM subjects s
            ORDER BY s.id
            "#
            .to_string(),
        ))
        .all(&self.db)
        .await
        .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| SubjectStats {
                subject_id: row.subject_id,
                name: row.name,
                question_count: row.question_count.max(0) as u64,
                session_count: row.session_count.max(0) as u64,
                average_score: round2(row.average_score),
            })
            .collect())
    }

    async fn by_difficulty(&self) -> AdminResult<Vec<DifficultyStats>> {
        let rows = DifficultyRow::find_by_statement(Statement::from_string(
            DbBackend::Postgres,
            r#"
            SELECT d.difficulty_level AS difficulty_level,
                   COUNT(DISTINCT q.id) AS question_count,
                   COUNT(a.id) AS attempt_count,
                   COUNT(a.id) FILTER (WHERE a.is_correct) AS correct_count
            FROM (VALUES ('easy'), ('medium'), ('hard')) AS d(difficulty_level)
            LEFT JOIN questions q ON q.difficulty_level = d.difficulty_level
            LEFT JOIN question_attempts a ON a.question_id = q.id
            GROUP BY d.difficulty_level
            ORDER BY array_position(ARRAY['easy', 'medium', 'hard'], d.difficulty_level)
            "#
            .to_string(),
        ))
        .all(&self.db)
        .await
        .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| DifficultyStats {
                difficulty_level: row.difficulty_level,
                question_count: row.question_count.max(0) as u64,
                attempt_count: row.attempt_count.max(0) as u64,
                correct_count: row.correct_count.max(0) as u64,
            })
            .collect())
    }

    async fn daily(&self, days: u32) -> AdminResult<Vec<DailyStats>> {
        let rows = DailyRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT to_char(date_trunc('day', completed_at), 'YYYY-MM-DD') AS day,
                   COUNT(*) AS session_count,
                   COALESCE(AVG(score), 0) AS average_score
            FROM practice_sessions
            WHERE completed_at >= now() - make_interval(days => $1)
            GROUP BY 1
            ORDER BY 1
            "#,
            [(days as i32).into()],
        ))
        .all(&self.db)
        .await
        .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| DailyStats {
                day: row.day,
                session_count: row.session_count.max(0) as u64,
                average_score: round2(row.average_score),
            })
            .collect())
    }

    async fn top_users(&self, limit: u64) -> AdminResult<Vec<TopUserStats>> {
        let rows = TopUserRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT u.id AS user_id,
                   u.email AS email,
                   u.full_name AS full_name,
                   COUNT(ps.id) AS session_count,
                   COALESCE(AVG(ps.score), 0) AS average_score
            FROM users u
            JOIN practice_sessions ps ON ps.user_id = u.id
            GROUP BY u.id, u.email, u.full_name
            ORDER BY average_score DESC, u.id
            LIMIT $1
            "#,
            [(limit as i64).into()],
        ))
        .all(&self.db)
        .await
        .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| TopUserStats {
                user_id: row.user_id,
                email: row.email,
                full_name: row.full_name,
                session_count: row.session_count.max(0) as u64,
                average_score: round2(row.average_score),
            })
            .collect())
    }

    async fn cleanup(&self) -> AdminResult<CleanupReport> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let mut report = CleanupReport::default();

        // Users with unparseable emails take their dependents with them
        let bad_users = format!("SELECT id FROM users WHERE {INVALID_EMAIL_PREDICATE}");
        for sql in [
            format!("DELETE FROM question_attempts WHERE user_id IN ({bad_users})"),
            format!("DELETE FROM practice_sessions WHERE user_id IN ({bad_users})"),
            format!("DELETE FROM user_enrollments WHERE user_id IN ({bad_users})"),
        ] {
            exec_count(&txn, &sql).await.map_err(db_err)?;
        }
        report.invalid_email_users = exec_count(
            &txn,
            &format!("DELETE FROM users WHERE {INVALID_EMAIL_PREDICATE}"),
        )
        .await
        .map_err(db_err)?;

        // Orphans, even though the FKs should prevent new ones: restores
        // and historical data predate the constraints
        report.orphaned_sessions = exec_count(
            &txn,
            "DELETE FROM practice_sessions ps \
             WHERE NOT EXISTS (SELECT 1 FROM users u WHERE u.id = ps.user_id) \
                OR NOT EXISTS (SELECT 1 FROM subjects s WHERE s.id = ps.subject_id)",
        )
        .await
        .map_err(db_err)?;

        report.orphaned_attempts = exec_count(
            &txn,
            "DELETE FROM question_attempts a \
             WHERE NOT EXISTS (SELECT 1 FROM users u WHERE u.id = a.user_id) \
                OR NOT EXISTS (SELECT 1 FROM questions q WHERE q.id = a.question_id) \
                OR NOT EXISTS (SELECT 1 FROM practice_sessions ps WHERE ps.id = a.session_id)",
        )
        .await
        .map_err(db_err)?;

        report.orphaned_enrollments = exec_count(
            &txn,
            "DELETE FROM user_enrollments e \
             WHERE NOT EXISTS (SELECT 1 FROM users u WHERE u.id = e.user_id) \
                OR NOT EXISTS (SELECT 1 FROM subjects s WHERE s.id = e.subject_id)",
        )
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(report)
    }
}
