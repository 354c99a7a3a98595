//! User record store
//!
//! Two layers:
//! - `UserRepository`: persistence backends (in-memory, PostgreSQL). A backend
//!   must make `insert` atomic with its username uniqueness check.
//! - `UserStore`: the domain operations on top of a backend. It hashes
//!   passwords, re-checks the contact-method invariant before every insert,
//!   and authenticates credentials.

mod memory;
mod postgres;

pub use memory::MemoryUserRepository;
pub use postgres::PgUserRepository;

use crate::password::{hash_password_with_config, verify_password, PasswordConfig, PasswordError};
use crate::user::User;
use crate::validation::ValidatedRegistration;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("A user with username '{0}' already exists")]
    UsernameTaken(String),

    #[error("User not found: {0}")]
    NotFound(String),

    /// A record without email or phone number reached the write path.
    /// Validation should have rejected it first, so this is a defect.
    #[error("Refusing to store user '{0}' without an email or phone number")]
    ContactInvariant(String),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(String),
}

/// Credential check failures
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive")]
    Inactive,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Listing filter for administrative queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Case-insensitive substring over username, names, email and phone number
    pub search: Option<String>,
    /// Restrict to active (`Some(true)`) or inactive (`Some(false)`) accounts
    pub is_active: Option<bool>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        if self.is_active.is_some_and(|active| active != user.is_active) {
            return false;
        }
        let Some(needle) = self.search.as_deref().map(str::to_lowercase) else {
            return true;
        };
        [
            Some(user.username.as_str()),
            Some(user.first_name.as_str()),
            Some(user.last_name.as_str()),
            user.email.as_deref(),
            user.phone_number.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Persistence backend for user records
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new record; fails with `UsernameTaken` if the username exists
    async fn insert(&self, user: User) -> Result<User, StoreError>;

    /// Exact, case-sensitive lookup
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Activate or deactivate an account
    async fn set_active(&self, username: &str, active: bool) -> Result<User, StoreError>;

    /// List records matching `filter`, oldest first
    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError>;
}

/// Domain operations over a user repository
#[derive(Clone)]
pub struct UserStore {
    repo: Arc<dyn UserRepository>,
    password: PasswordConfig,
}

impl UserStore {
    pub fn new(repo: Arc<dyn UserRepository>, password: PasswordConfig) -> Self {
        Self { repo, password }
    }

    /// Store backed by a fresh in-memory repository
    pub fn in_memory(password: PasswordConfig) -> Self {
        Self::new(Arc::new(MemoryUserRepository::new()), password)
    }

    /// Create a user from validated registration fields
    ///
    /// The password is hashed before the record is built; the plaintext
    /// never reaches the repository.
    pub async fn create_user(&self, fields: ValidatedRegistration) -> Result<User, StoreError> {
        let ValidatedRegistration {
            username,
            password,
            first_name,
            last_name,
            email,
            phone_number,
        } = fields;

        let password_hash = hash_password_with_config(&password, &self.password)?;
        let user = User::new(username, password_hash, first_name, last_name, email, phone_number);

        if !user.check_contact_invariant() {
            error!(
                username = %user.username,
                "contact-method invariant violated at persistence time; validator and store disagree"
            );
            return Err(StoreError::ContactInvariant(user.username));
        }

        let created = self.repo.insert(user).await?;
        info!(user_id = %created.id, username = %created.username, "user created");
        Ok(created)
    }

    /// Look up `username` and verify `password` against the stored hash
    ///
    /// Unknown user and wrong password both return `InvalidCredentials`.
    /// `Inactive` is only reported once the password has been verified.
    pub async fn find_and_verify(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let Some(user) = self.repo.find_by_username(username).await? else {
            // Pay one hash so unknown usernames cost the same as wrong passwords
            hash_password_with_config(password, &self.password).ok();
            debug!(username = %username, "login for unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash).map_err(StoreError::from)? {
            debug!(user_id = %user.id, "login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthError::Inactive);
        }

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.repo.find_by_username(username).await
    }

    pub async fn set_active(&self, username: &str, active: bool) -> Result<User, StoreError> {
        let user = self.repo.set_active(username, active).await?;
        info!(
            user_id = %user.id,
            username = %user.username,
            is_active = active,
            "account status changed"
        );
        Ok(user)
    }

    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        self.repo.list(filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> UserStore {
        UserStore::in_memory(PasswordConfig::insecure_fast())
    }

    fn registration(username: &str) -> ValidatedRegistration {
        ValidatedRegistration {
            username: username.to_string(),
            password: "secret1".to_string(),
            first_name: "Alice".to_string(),
            last_name: "A".to_string(),
            email: Some("a@x.com".to_string()),
            phone_number: None,
        }
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let store = store();
        let user = store.create_user(registration("alice")).await.unwrap();

        assert_eq!(user.username, "alice");
        assert!(user.is_active);
        assert_ne!(user.password_hash, "secret1");
        assert!(!user.password_hash.contains("secret1"));
        assert!(verify_password("secret1", &user.password_hash).unwrap());

        let stored = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(stored, user);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = store();
        store.create_user(registration("alice")).await.unwrap();

        let mut other = registration("alice");
        other.first_name = "Someone".to_string();
        other.email = None;
        other.phone_number = Some("0912345678".to_string());

        let result = store.create_user(other).await;
        assert!(matches!(result, Err(StoreError::UsernameTaken(name)) if name == "alice"));
        assert_eq!(store.list(&UserFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_contact_invariant_aborts_write() {
        let store = store();
        let mut fields = registration("ghost");
        fields.email = None;
        fields.phone_number = Some("   ".to_string());

        let result = store.create_user(fields).await;

        assert!(matches!(result, Err(StoreError::ContactInvariant(_))));
        assert!(store.find_by_username("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_and_verify() {
        let store = store();
        let created = store.create_user(registration("alice")).await.unwrap();

        let user = store.find_and_verify("alice", "secret1").await.unwrap();
        assert_eq!(user.id, created.id);
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
        let store = store();
        store.create_user(registration("alice")).await.unwrap();

        let wrong_password = store.find_and_verify("alice", "wrong-pass").await.unwrap_err();
        let unknown_user = store.find_and_verify("mallory", "secret1").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_username_lookup_is_case_sensitive() {
        let store = store();
        store.create_user(registration("alice")).await.unwrap();

        let result = store.find_and_verify("Alice", "secret1").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_inactive_account() {
        let store = store();
        store.create_user(registration("alice")).await.unwrap();
        store.set_active("alice", false).await.unwrap();

        let result = store.find_and_verify("alice", "secret1").await;
        assert!(matches!(result, Err(AuthError::Inactive)));

        // Wrong password on an inactive account reveals nothing
        let result = store.find_and_verify("alice", "wrong-pass").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));

        store.set_active("alice", true).await.unwrap();
        assert!(store.find_and_verify("alice", "secret1").await.is_ok());
    }

    #[tokio::test]
    async fn test_set_active_unknown_user() {
        let result = store().set_active("nobody", false).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registration_creates_one_user() {
        let store = store();

        let attempts = (0..16).map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.create_user(registration("racer")).await })
        });
        let results = futures::future::join_all(attempts).await;

        let created = results
            .into_iter()
            .map(|joined| joined.unwrap())
            .filter(Result::is_ok)
            .count();
        assert_eq!(created, 1);
        assert_eq!(store.list(&UserFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_filter() {
        let store = store();
        store.create_user(registration("alice")).await.unwrap();
        let mut bob = registration("bob");
        bob.first_name = "Robert".to_string();
        bob.email = Some("bob@example.com".to_string());
        store.create_user(bob).await.unwrap();
        store.set_active("bob", false).await.unwrap();

        let all = store.list(&UserFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let search = UserFilter {
            search: Some("ROBERT".to_string()),
            ..Default::default()
        };
        let found = store.list(&search).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, "bob");

        let inactive = UserFilter {
            is_active: Some(false),
            ..Default::default()
        };
        assert_eq!(store.list(&inactive).await.unwrap()[0].username, "bob");
    }
}
