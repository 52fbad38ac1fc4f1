use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250801_000000_create_users::Users;
use crate::m20250801_000001_create_subjects::Subjects;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PracticeSessions::Table)
                    .if_not_exists()
                    .col(pk_auto(PracticeSessions::Id))
                    .col(integer(PracticeSessions::UserId))
                    .col(integer(PracticeSessions::SubjectId))
                    .col(double(PracticeSessions::Score).default(0.0))
                    .col(integer(PracticeSessions::TotalQuestions).default(0))
                    .col(integer(PracticeSessions::CorrectAnswers).default(0))
                    .col(integer(PracticeSessions::TimeTaken).default(0))
                    .col(
                        timestamp_with_time_zone(PracticeSessions::CompletedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_practice_sessions_user")
                            .from(PracticeSessions::Table, PracticeSessions::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_practice_sessions_subject")
                            .from(PracticeSessions::Table, PracticeSessions::SubjectId)
                            .to(Subjects::Table, Subjects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_practice_sessions_user_id")
                    .table(PracticeSessions::Table)
                    .col(PracticeSessions::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_practice_sessions_completed_at")
                    .table(PracticeSessions::Table)
                    .col(PracticeSessions::CompletedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PracticeSessions::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum PracticeSessions {
    Table,
    Id,
    UserId,
    SubjectId,
    Score,
    TotalQuestions,
    CorrectAnswers,
    TimeTaken,
    CompletedAt,
}
