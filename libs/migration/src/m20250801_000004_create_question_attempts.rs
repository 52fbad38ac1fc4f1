use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250801_000000_create_users::Users;
use crate::m20250801_000002_create_questions::Questions;
use crate::m20250801_000003_create_practice_sessions::PracticeSessions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QuestionAttempts::Table)
                    .if_not_exists()
                    .col(pk_auto(QuestionAttempts::Id))
                    .col(integer(QuestionAttempts::UserId))
                    .col(integer(QuestionAttempts::QuestionId))
                    .col(integer(QuestionAttempts::SessionId))
                    .col(
                        ColumnDef::new(QuestionAttempts::SelectedAnswer)
                            .string_len(1)
                            .not_null(),
                    )
                    .col(boolean(QuestionAttempts::IsCorrect))
                    .col(integer(QuestionAttempts::TimeTaken).default(0))
                    .col(
                        timestamp_with_time_zone(QuestionAttempts::AttemptedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_attempts_user")
                            .from(QuestionAttempts::Table, QuestionAttempts::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_attempts_question")
                            .from(QuestionAttempts::Table, QuestionAttempts::QuestionId)
                            .to(Questions::Table, Questions::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_attempts_session")
                            .from(QuestionAttempts::Table, QuestionAttempts::SessionId)
                            .to(PracticeSessions::Table, PracticeSessions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_question_attempts_user_id")
                    .table(QuestionAttempts::Table)
                    .col(QuestionAttempts::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_question_attempts_session_id")
                    .table(QuestionAttempts::Table)
                    .col(QuestionAttempts::SessionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuestionAttempts::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum QuestionAttempts {
    Table,
    Id,
    UserId,
    QuestionId,
    SessionId,
    SelectedAnswer,
    IsCorrect,
    TimeTaken,
    AttemptedAt,
}
