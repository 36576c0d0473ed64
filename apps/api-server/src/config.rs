//! Server configuration, read from the environment at startup.

use std::env;

use blogicum_infra::database::DatabaseConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
}

/// Startup cannot proceed without these.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        let mut database = DatabaseConfig::new(url);
        if let Some(max) = parsed_var("DB_MAX_CONNECTIONS") {
            database.max_connections = max;
        }
        if let Some(min) = parsed_var("DB_MIN_CONNECTIONS") {
            database.min_connections = min;
        }

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed_var("PORT").unwrap_or(8080),
            database,
        })
    }
}

/// Reads and parses an env var, treating unset and unparsable alike.
fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|raw| raw.parse().ok())
}
