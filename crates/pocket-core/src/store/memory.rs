//! In-memory user repository
//!
//! Used by the development server when no database is configured, and by tests.

use super::{StoreError, UserFilter, UserRepository};
use crate::user::User;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Users keyed by username behind a single lock
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: User) -> Result<User, StoreError> {
        // Check and insert under one write guard
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(StoreError::UsernameTaken(user.username));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn set_active(&self, username: &str, active: bool) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(username)
            .ok_or_else(|| StoreError::NotFound(username.to_string()))?;
        user.is_active = active;
        Ok(user.clone())
    }

    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await;
        let mut matched: Vec<User> = users
            .values()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.username.cmp(&b.username))
        });
        Ok(matched)
    }
}
