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
                    .table(UserEnrollments::Table)
                    .if_not_exists()
                    .col(pk_auto(UserEnrollments::Id))
                    .col(integer(UserEnrollments::UserId))
                    .col(integer(UserEnrollments::SubjectId))
                    .col(boolean(UserEnrollments::IsActive).default(true))
                    .col(
                        timestamp_with_time_zone(UserEnrollments::EnrolledAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_enrollments_user")
                            .from(UserEnrollments::Table, UserEnrollments::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_enrollments_subject")
                            .from(UserEnrollments::Table, UserEnrollments::SubjectId)
                            .to(Subjects::Table, Subjects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one active enrollment per (user, subject). The service
        // performs a read-then-write idempotency check; this index is the
        // backstop for concurrent duplicates.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE UNIQUE INDEX idx_user_enrollments_active_pair
                    ON user_enrollments (user_id, subject_id)
                    WHERE is_active
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS idx_user_enrollments_active_pair")
            .await?;

        manager
            .drop_table(Table::drop().table(UserEnrollments::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum UserEnrollments {
    Table,
    Id,
    UserId,
    SubjectId,
    IsActive,
    EnrolledAt,
}
