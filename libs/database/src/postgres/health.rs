use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};

/// Readiness probe: runs `SELECT 1` against the pool.
pub async fn check_health(db: &DatabaseConnection) -> Result<(), String> {
    db.execute_raw(Statement::from_string(
        DbBackend::Postgres,
        "SELECT 1".to_string(),
    ))
    .await
    .map(|_| ())
    .map_err(|e| e.to_string())
}
