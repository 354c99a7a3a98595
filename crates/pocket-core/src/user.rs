//! User record and its public projection
//!
//! `User` is the stored identity: credentials, profile and account state.
//! `PublicUser` is the allow-listed view that goes out over the wire; it has
//! no password field at all, so nothing can leak it by accident.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// User account record
///
/// Maps to the `users` table in PostgreSQL.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Unique user identifier, assigned at creation
    pub id: Uuid,

    /// Login name (unique, case-sensitive)
    pub username: String,

    /// Argon2id PHC string
    pub password_hash: String,

    pub first_name: String,

    pub last_name: String,

    pub email: Option<String>,

    /// 10-11 ASCII digits
    pub phone_number: Option<String>,

    /// Deactivated accounts cannot log in
    pub is_active: bool,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a new active user with a fresh id
    ///
    /// `password_hash` must already be hashed (see `password::hash_password`).
    pub fn new(
        username: String,
        password_hash: String,
        first_name: String,
        last_name: String,
        email: Option<String>,
        phone_number: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            first_name,
            last_name,
            email,
            phone_number,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Whether the record satisfies the contact-method rule:
    /// at least one of email or phone number is non-blank
    pub fn check_contact_invariant(&self) -> bool {
        has_text(self.email.as_deref()) || has_text(self.phone_number.as_deref())
    }

    /// Convert user to public representation (without sensitive fields)
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
        }
    }
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            write!(f, "{} - {}", self.username, self.username)
        } else {
            write!(f, "{} - {}", self.username, name)
        }
    }
}

/// Public user representation (safe for API responses)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        user.to_public()
    }
}
