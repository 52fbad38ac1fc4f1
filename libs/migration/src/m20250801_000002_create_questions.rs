use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250801_000001_create_subjects::Subjects;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(pk_auto(Questions::Id))
                    .col(integer(Questions::SubjectId))
                    .col(text(Questions::QuestionText))
                    .col(string(Questions::OptionA))
                    .col(string(Questions::OptionB))
                    .col(string(Questions::OptionC))
                    .col(string(Questions::OptionD))
                    .col(
                        ColumnDef::new(Questions::CorrectAnswer)
                            .string_len(1)
                            .not_null(),
                    )
                    .col(text_null(Questions::Explanation))
                    .col(
                        ColumnDef::new(Questions::DifficultyLevel)
                            .string_len(20)
                            .not_null()
                            .default("medium"),
                    )
                    .col(boolean(Questions::IsActive).default(true))
                    .col(
                        timestamp_with_time_zone(Questions::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_questions_subject")
                            .from(Questions::Table, Questions::SubjectId)
                            .to(Subjects::Table, Subjects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_questions_subject_id")
                    .table(Questions::Table)
                    .col(Questions::SubjectId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Questions {
    Table,
    Id,
    SubjectId,
    QuestionText,
    OptionA,
    OptionB,
    OptionC,
    OptionD,
    CorrectAnswer,
    Explanation,
    DifficultyLevel,
    IsActive,
    CreatedAt,
}
