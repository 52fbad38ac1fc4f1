use axum_helpers::health::health_router;
use axum_helpers::server::{create_app, with_common_layers};
use axum_helpers::JwtAuth;
use core_config::tracing::{init_tracing, install_color_eyre};
use migration::Migrator;
use tracing::info;

mod api;
mod auth;
mod config;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Colored error output before any fallible operation
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), 5)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    database::postgres::run_migrations::<Migrator>(&db)
        .await
        .map_err(|e| eyre::eyre!("Migration failed: {}", e))?;

    let jwt_auth = JwtAuth::new(config.jwt_secret.clone(), config.token_ttl_secs);

    let state = AppState {
        config,
        db,
        jwt_auth,
    };

    let router = with_common_layers(
        api::routes(&state)
            .merge(health_router("studylearn-api"))
            .merge(api::ready_router(state.clone())),
    );

    info!("Starting StudyLearn API");

    create_app(router, &state.config.server)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("StudyLearn API shutdown complete");
    Ok(())
}
