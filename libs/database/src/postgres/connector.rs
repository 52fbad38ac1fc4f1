use super::config::PostgresConfig;
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::{info, warn};

/// Connect using a bare URL with default pool options.
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    connect_from_config(PostgresConfig::new(url)).await
}

/// Connect using a full [`PostgresConfig`].
pub async fn connect_from_config(config: PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(config.into_connect_options()).await?;
    info!("PostgreSQL connection established");
    Ok(db)
}

/// Connect with a bounded startup retry loop.
///
/// Services come up before the database in most orchestrations; retrying a
/// few times at startup avoids a crash loop. This is startup-only — request
/// paths never retry.
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    max_attempts: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut attempt = 1;
    loop {
        match connect_from_config(config.clone()).await {
            Ok(db) => return Ok(db),
            Err(e) if attempt < max_attempts => {
                warn!(
                    attempt,
                    max_attempts,
                    "PostgreSQL connection failed, retrying: {}",
                    e
                );
                tokio::time::sleep(Duration::from_secs(2)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Run pending migrations with the given migrator.
pub async fn run_migrations<M: MigratorTrait>(db: &DatabaseConnection) -> Result<(), DbErr> {
    info!("Running database migrations");
    M::up(db, None).await?;
    info!("Migrations complete");
    Ok(())
}
