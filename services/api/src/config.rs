//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::str::FromStr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Where entities are persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL at the given connection string.
    Postgres { database_url: String },
    /// Process-local tables, lost on restart.
    Memory,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub storage: StorageBackend,
    pub db_max_connections: u32,
    pub log_level: Level,
    pub cors_origin: String,
    pub session_ttl_days: i64,
    pub cookie_secure: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = std::env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        // --- Load Storage Settings ---
        let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "postgres".to_string());
        let storage = match backend.to_lowercase().as_str() {
            "postgres" => StorageBackend::Postgres {
                database_url: std::env::var("DATABASE_URL")
                    .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?,
            },
            "memory" => StorageBackend::Memory,
            other => {
                return Err(ConfigError::InvalidValue(
                    "STORAGE_BACKEND".to_string(),
                    format!("'{}' is not one of postgres, memory", other),
                ))
            }
        };
        let db_max_connections = parse_var("DB_MAX_CONNECTIONS", 5)?;

        // --- Load Auth Settings ---
        let session_ttl_days = check_session_ttl_days(parse_var("SESSION_TTL_DAYS", 30)?)?;
        let cookie_secure = parse_var("COOKIE_SECURE", true)?;

        Ok(Self {
            bind_address,
            storage,
            db_max_connections,
            log_level,
            cors_origin,
            session_ttl_days,
            cookie_secure,
        })
    }
}

/// Longest login session accepted from `SESSION_TTL_DAYS`, ten years.
pub const MAX_SESSION_TTL_DAYS: i64 = 3650;

fn check_session_ttl_days(days: i64) -> Result<i64, ConfigError> {
    if (1..=MAX_SESSION_TTL_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(ConfigError::InvalidValue(
            "SESSION_TTL_DAYS".to_string(),
            format!("{} is not between 1 and {} days", days, MAX_SESSION_TTL_DAYS),
        ))
    }
}

/// Reads an optional variable, falling back to `default` when it is unset.
fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_falls_back_when_unset() {
        let value: u32 = parse_var("IDEABOARD_TEST_SURELY_UNSET", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn session_ttl_must_be_within_range() {
        assert_eq!(check_session_ttl_days(30).unwrap(), 30);
        assert_eq!(check_session_ttl_days(MAX_SESSION_TTL_DAYS).unwrap(), MAX_SESSION_TTL_DAYS);
        for days in [0, -1, MAX_SESSION_TTL_DAYS + 1, 200_000_000] {
            assert!(matches!(
                check_session_ttl_days(days),
                Err(ConfigError::InvalidValue(name, _)) if name == "SESSION_TTL_DAYS"
            ));
        }
    }

    #[test]
    fn invalid_value_names_the_variable() {
        let err = ConfigError::InvalidValue("SESSION_TTL_DAYS".into(), "nope".into());
        assert_eq!(
            err.to_string(),
            "Invalid value for the environment variable SESSION_TTL_DAYS: nope"
        );
    }
}
