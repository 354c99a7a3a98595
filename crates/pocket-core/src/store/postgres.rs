//! PostgreSQL user repository
//!
//! Username uniqueness and the contact-method rule are also enforced by the
//! table itself, so concurrent registrations cannot slip past each other.

use super::{StoreError, UserFilter, UserRepository};
use crate::user::User;
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

const USER_COLUMNS: &str =
    "id, username, password_hash, first_name, last_name, email, phone_number, is_active, created_at";

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username VARCHAR(150) NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        first_name VARCHAR(150) NOT NULL,
        last_name VARCHAR(150) NOT NULL,
        email VARCHAR(254),
        phone_number VARCHAR(20),
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT users_contact_method CHECK (
            COALESCE(BTRIM(email), '') <> '' OR COALESCE(BTRIM(phone_number), '') <> ''
        )
    )
"#;

/// PostgreSQL-backed user repository
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Connect to `database_url` with a pool of `max_connections`
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Database(format!("PostgreSQL connection failed: {e}")))?;

        Ok(Self { pool })
    }

    /// Create from an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `users` table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_USERS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to create users table: {e}")))?;
        Ok(())
    }
}

fn map_insert_error(err: sqlx::Error, username: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::UsernameTaken(username.to_string());
        }
        if db.is_check_violation() {
            return StoreError::ContactInvariant(username.to_string());
        }
    }
    StoreError::Database(format!("Failed to create user: {err}"))
}

/// `ILIKE` pattern matching `search` as a literal substring
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let query = format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.phone_number)
            .bind(user.is_active)
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, &user.username))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to fetch user: {e}")))
    }

    async fn set_active(&self, username: &str, active: bool) -> Result<User, StoreError> {
        let query =
            format!("UPDATE users SET is_active = $2 WHERE username = $1 RETURNING {USER_COLUMNS}");

        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to update user: {e}")))?
            .ok_or_else(|| StoreError::NotFound(username.to_string()))
    }

    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        let query = format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE ($1::TEXT IS NULL
                   OR username ILIKE $1 OR first_name ILIKE $1 OR last_name ILIKE $1
                   OR email ILIKE $1 OR phone_number ILIKE $1)
              AND ($2::BOOLEAN IS NULL OR is_active = $2)
            ORDER BY created_at, username
            "#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(filter.is_active)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to list users: {e}")))
    }
}
