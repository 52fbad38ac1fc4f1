pub use sea_orm_migration::prelude::*;

mod m20250801_000000_create_users;
mod m20250801_000001_create_subjects;
mod m20250801_000002_create_questions;
mod m20250801_000003_create_practice_sessions;
mod m20250801_000004_create_question_attempts;
mod m20250801_000005_create_user_enrollments;
mod m20250802_000000_create_content_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000000_create_users::Migration),
            Box::new(m20250801_000001_create_subjects::Migration),
            Box::new(m20250801_000002_create_questions::Migration),
            Box::new(m20250801_000003_create_practice_sessions::Migration),
            Box::new(m20250801_000004_create_question_attempts::Migration),
            Box::new(m20250801_000005_create_user_enrollments::Migration),
            Box::new(m20250802_000000_create_content_tables::Migration),
        ]
    }
}
