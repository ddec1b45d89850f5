//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use database::Database;

/// Allowed cross-origin callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// Any origin, without credentials.
    Any,
    /// Only these origins, with credentials.
    List(Vec<String>),
}

impl CorsOrigins {
    /// Parse a comma-separated origin list; `*` or an empty list means any origin.
    pub fn parse(value: &str) -> Self {
        let origins: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

/// Tracker server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Maximum pooled database connections.
    pub pool_size: u32,
    /// Allowed CORS origins.
    pub cors_origins: CorsOrigins,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `TRACKER_ADDR` | Server bind address | `0.0.0.0:5000` |
    /// | `PORT` | Overrides the port of `TRACKER_ADDR` | (unset) |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:tracker.db?mode=rwc` |
    /// | `DATABASE_POOL_SIZE` | Pool size | `20` |
    /// | `CORS_ORIGINS` | Comma-separated origins, `*` for any | `*` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut addr: SocketAddr = var("TRACKER_ADDR")
            .unwrap_or_else(|| "0.0.0.0:5000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        if let Some(port) = var("PORT") {
            let port = port.trim().parse().map_err(|_| ConfigError::InvalidPort(port))?;
            addr.set_port(port);
        }

        let database_url =
            var("SQLITE_PATH").unwrap_or_else(|| "sqlite:tracker.db?mode=rwc".to_string());

        let pool_size = match var("DATABASE_POOL_SIZE") {
            Some(value) => value
                .trim()
                .parse()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidPoolSize(value))?,
            None => Database::DEFAULT_POOL_SIZE,
        };

        let cors_origins = CorsOrigins::parse(&var("CORS_ORIGINS").unwrap_or_default());

        Ok(Self {
            addr,
            database_url,
            pool_size,
            cors_origins,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TRACKER_ADDR format")]
    InvalidAddr,

    #[error("Invalid PORT: {0}")]
    InvalidPort(String),

    #[error("Invalid DATABASE_POOL_SIZE: {0}")]
    InvalidPoolSize(String),
}
