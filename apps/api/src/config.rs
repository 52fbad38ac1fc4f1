use axum_helpers::auth::DEFAULT_TOKEN_TTL_SECS;
use core_config::{env_or_default, server::ServerConfig, ConfigError, Environment, FromEnv};
use database::postgres::PostgresConfig;

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?;
        let server = ServerConfig::from_env()?;

        let jwt_secret = env_or_default("JWT_SECRET", "dev-secret-change-me");
        if jwt_secret == "dev-secret-change-me" && environment.is_production() {
            return Err(ConfigError::MissingEnvVar("JWT_SECRET".to_string()));
        }

        let token_ttl_secs = env_or_default("TOKEN_TTL_SECS", &DEFAULT_TOKEN_TTL_SECS.to_string())
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "TOKEN_TTL_SECS".to_string(),
                details: format!("{}", e),
            })?;

        Ok(Self {
            database,
            server,
            environment,
            jwt_secret,
            token_ttl_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_requires_real_jwt_secret() {
        temp_env::with_vars(
            [
                ("APP_ENV", Some("production")),
                ("DATABASE_URL", Some("postgresql://localhost/studylearn")),
                ("JWT_SECRET", None),
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }

    #[test]
    fn test_development_defaults() {
        temp_env::with_vars(
            [
                ("APP_ENV", None::<&str>),
                ("DATABASE_URL", Some("postgresql://localhost/studylearn")),
                ("JWT_SECRET", None),
                ("TOKEN_TTL_SECS", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);
                assert!(config.environment.is_development());
            },
        );
    }
}
