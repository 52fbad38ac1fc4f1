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
                    .table(SubjectContents::Table)
                    .if_not_exists()
                    .col(pk_auto(SubjectContents::Id))
                    .col(integer(SubjectContents::SubjectId))
                    .col(string(SubjectContents::Title))
                    .col(text(SubjectContents::Body))
                    .col(
                        timestamp_with_time_zone(SubjectContents::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subject_contents_subject")
                            .from(SubjectContents::Table, SubjectContents::SubjectId)
                            .to(Subjects::Table, Subjects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Lessons::Table)
                    .if_not_exists()
                    .col(pk_auto(Lessons::Id))
                    .col(integer(Lessons::ContentId))
                    .col(string(Lessons::Title))
                    .col(text(Lessons::Body))
                    .col(
                        timestamp_with_time_zone(Lessons::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lessons_content")
                            .from(Lessons::Table, Lessons::ContentId)
                            .to(SubjectContents::Table, SubjectContents::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Lessons::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SubjectContents::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum SubjectContents {
    Table,
    Id,
    SubjectId,
    Title,
    Body,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Lessons {
    Table,
    Id,
    ContentId,
    Title,
    Body,
    CreatedAt,
}
