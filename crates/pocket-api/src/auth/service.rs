//! Authentication service layer
//!
//! Runs the register and login pipelines on a raw JSON body: normalize,
//! validate, touch the user store, then issue a token pair.

use super::jwt::{TokenIssuer, TokenPair};
use crate::error::AppError;
use pocket_core::{
    validate_login, validate_registration, AuthError, LoginPayload, PublicUser, RegisterPayload,
    User, UserStore,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use utoipa::ToSchema;

pub const MSG_INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";
pub const MSG_ACCOUNT_INACTIVE: &str = "This account has been deactivated.";

pub const REGISTER_MESSAGE: &str = "Registration successful";
pub const LOGIN_MESSAGE: &str = "Login successful";

/// User registration request
///
/// Name keys are also accepted in camelCase (`firstName`, `lastName`); snake
/// case wins when both are sent. The phone number is read from `phoneNumber`
/// only.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
}

/// User login request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Authentication response with tokens
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: PublicUser,
    /// Short-lived access token
    pub access: String,
    /// Long-lived refresh token
    pub refresh: String,
    pub message: String,
}

impl AuthResponse {
    fn new(user: &User, tokens: TokenPair, message: &str) -> Self {
        Self {
            user: user.to_public(),
            access: tokens.access,
            refresh: tokens.refresh,
            message: message.to_string(),
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: UserStore,
    issuer: TokenIssuer,
    reveal_inactive: bool,
}

impl AuthService {
    pub fn new(store: UserStore, issuer: TokenIssuer, reveal_inactive: bool) -> Self {
        Self {
            store,
            issuer,
            reveal_inactive,
        }
    }

    /// Register a new user and sign them in
    ///
    /// Nothing is written and no token is issued unless every field passes.
    pub async fn register(&self, body: &Value) -> Result<AuthResponse, AppError> {
        let payload = RegisterPayload::from_json(body)?;
        debug!(fields = ?payload.present_fields(), "registration payload received");

        let fields = validate_registration(&payload)?;
        let user = self.store.create_user(fields).await?;
        let tokens = self.issuer.issue(&user)?;

        Ok(AuthResponse::new(&user, tokens, REGISTER_MESSAGE))
    }

    /// Check credentials and issue a fresh token pair
    pub async fn login(&self, body: &Value) -> Result<AuthResponse, AppError> {
        let payload = LoginPayload::from_json(body)?;
        let credentials = validate_login(&payload)?;

        let user = self
            .store
            .find_and_verify(&credentials.username, &credentials.password)
            .await
            .map_err(|e| self.auth_failure(e))?;

        let tokens = self.issuer.issue(&user)?;
        info!(user_id = %user.id, username = %user.username, "user logged in");

        Ok(AuthResponse::new(&user, tokens, LOGIN_MESSAGE))
    }

    fn auth_failure(&self, err: AuthError) -> AppError {
        match err {
            AuthError::InvalidCredentials => AppError::Auth(MSG_INVALID_CREDENTIALS.to_string()),
            AuthError::Inactive if self.reveal_inactive => {
                AppError::Auth(MSG_ACCOUNT_INACTIVE.to_string())
            }
            AuthError::Inactive => AppError::Auth(MSG_INVALID_CREDENTIALS.to_string()),
            AuthError::Store(e) => AppError::from(e),
        }
    }
}
