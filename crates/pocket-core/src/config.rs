//! Pocket Configuration Management
//!
//! Handles configuration from environment variables and TOML files
//! with sensible defaults for development.

use crate::password::PasswordConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Database connection
    pub database: DatabaseConfig,

    /// Token issuance and login policy
    pub auth: AuthConfig,

    /// Argon2 parameters for password hashing
    pub password: PasswordConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Load from the file named by `POCKET_CONFIG` (if any), then apply env overrides
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var("POCKET_CONFIG") {
            Ok(path) => Self::from_file(path)?.with_env_override(),
            Err(_) => Self::from_env(),
        }
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        self.apply_env()?;
        Ok(self)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            self.server.port = parse_value("API_PORT", port)?;
        }
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // PostgreSQL
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.postgres_url = Some(url).filter(|u| !u.trim().is_empty());
        }
        if let Ok(size) = std::env::var("DATABASE_POOL_SIZE") {
            self.database.pool_size = parse_value("DATABASE_POOL_SIZE", size)?;
        }

        // Tokens
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Ok(issuer) = std::env::var("JWT_ISSUER") {
            self.auth.issuer = issuer;
        }
        if let Ok(secs) = std::env::var("JWT_ACCESS_EXPIRATION_SECS") {
            self.auth.access_expiration_secs = parse_value("JWT_ACCESS_EXPIRATION_SECS", secs)?;
        }
        if let Ok(secs) = std::env::var("JWT_REFRESH_EXPIRATION_SECS") {
            self.auth.refresh_expiration_secs = parse_value("JWT_REFRESH_EXPIRATION_SECS", secs)?;
        }
        if let Ok(flag) = std::env::var("AUTH_REVEAL_INACTIVE") {
            self.auth.reveal_inactive_accounts = parse_value("AUTH_REVEAL_INACTIVE", flag)?;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(flag) = std::env::var("LOG_JSON") {
            self.logging.json_format = parse_value("LOG_JSON", flag)?;
        }

        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed origins for CORS (empty means any origin, development only)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec![],
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL; `None` selects the in-memory store
    pub postgres_url: Option<String>,

    /// PostgreSQL connection pool size
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            postgres_url: None,
            pool_size: 5,
        }
    }
}

/// Token issuance and login policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Secret key for HMAC signing (must be at least 256 bits in production)
    pub jwt_secret: String,

    /// Token issuer identifier
    pub issuer: String,

    /// Access token lifetime in seconds
    pub access_expiration_secs: u64,

    /// Refresh token lifetime in seconds
    pub refresh_expiration_secs: u64,

    /// Report deactivated accounts with their own message instead of
    /// the generic invalid-credentials one
    pub reveal_inactive_accounts: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-key-change-in-production".to_string(),
            issuer: "pocket-api".to_string(),
            access_expiration_secs: 300,
            refresh_expiration_secs: 86_400,
            reveal_inactive_accounts: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "pocket_api=debug,pocket_core=debug,tower_http=debug".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
