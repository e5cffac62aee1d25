//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database host
    pub db_host: String,

    /// Database port
    pub db_port: u16,

    /// Database user
    pub db_user: String,

    /// Database password
    pub db_password: String,

    /// Database name
    pub db_name: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// How long a request waits for a free pooled connection
    pub database_acquire_timeout: Duration,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::MissingEnv(key));

        let db_host = required("DB_HOST")?;
        let db_user = required("DB_USER")?;
        let db_password = required("DB_PASSWORD")?;
        let db_name = required("DB_NAME")?;

        let db_port = lookup("DB_PORT")
            .unwrap_or_else(|| "5432".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DB_PORT"))?;

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        if database_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"));
        }

        let acquire_timeout_secs: u64 = lookup("DATABASE_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_ACQUIRE_TIMEOUT_SECS"))?;

        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("APP_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("APP_PORT"))?;

        Ok(Self {
            db_host,
            db_port,
            db_user,
            db_password,
            db_name,
            database_max_connections,
            database_acquire_timeout: Duration::from_secs(acquire_timeout_secs),
            host,
            port,
        })
    }

    /// Connection options for the configured database
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
