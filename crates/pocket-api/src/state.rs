//! Application state management

use crate::auth::{AuthService, JwtConfig, TokenIssuer};
use pocket_core::{AppConfig, PgUserRepository, StoreError, UserStore};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Server start time
    pub start_time: Instant,
    /// User records
    pub store: UserStore,
    /// Token signing
    pub issuer: TokenIssuer,
}

impl AppState {
    /// Create state over an existing store
    pub fn new(config: AppConfig, store: UserStore) -> Self {
        let issuer = TokenIssuer::new(JwtConfig::from(&config.auth));
        Self {
            config,
            start_time: Instant::now(),
            store,
            issuer,
        }
    }

    /// Create state backed by an in-memory store
    pub fn in_memory(config: AppConfig) -> Self {
        let store = UserStore::in_memory(config.password.clone());
        Self::new(config, store)
    }

    /// Create state with the store selected by `config.database`
    ///
    /// PostgreSQL when a URL is configured (the schema is created if missing),
    /// otherwise the in-memory store.
    pub async fn from_config(config: AppConfig) -> Result<Self, StoreError> {
        let Some(url) = config.database.postgres_url.clone() else {
            warn!("DATABASE_URL not set; using in-memory user store (data is lost on restart)");
            return Ok(Self::in_memory(config));
        };

        let repo = PgUserRepository::connect(&url, config.database.pool_size).await?;
        repo.ensure_schema().await?;
        info!(pool_size = config.database.pool_size, "Connected to PostgreSQL");

        let store = UserStore::new(Arc::new(repo), config.password.clone());
        Ok(Self::new(config, store))
    }

    /// Authentication service for one request
    pub fn auth_service(&self) -> AuthService {
        AuthService::new(
            self.store.clone(),
            self.issuer.clone(),
            self.config.auth.reveal_inactive_accounts,
        )
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory(AppConfig::default())
    }
}
