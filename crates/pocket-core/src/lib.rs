//! Pocket Core - User records, credential validation, and the user store
//!
//! This crate defines the domain layer of the Pocket authentication backend:
//! - The `User` record and its public projection
//! - Registration and login payload validation
//! - Password hashing with Argon2id
//! - The user store (repository trait, in-memory and PostgreSQL backends)
//! - Configuration management

pub mod config;
pub mod password;
pub mod store;
pub mod user;
pub mod validation;

pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, LoggingConfig, ServerConfig};
pub use password::{
    hash_password, hash_password_with_config, verify_password, PasswordConfig, PasswordError,
};
pub use store::{
    AuthError, MemoryUserRepository, PgUserRepository, StoreError, UserFilter, UserRepository,
    UserStore,
};
pub use user::{PublicUser, User};
pub use validation::{
    validate_login, validate_registration, Credentials, FieldErrors, LoginPayload,
    RegisterPayload, ValidatedRegistration, NON_FIELD_ERRORS,
};

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Crate-level error for plumbing that spans several layers (CLI, startup)
#[derive(Error, Debug)]
pub enum PocketError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<FieldErrors> for PocketError {
    fn from(errors: FieldErrors) -> Self {
        PocketError::Validation(errors)
    }
}

pub type Result<T> = std::result::Result<T, PocketError>;
