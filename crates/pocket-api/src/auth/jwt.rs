//! JWT token issuance and validation
//!
//! Issues HMAC-SHA256 signed access/refresh token pairs. Both tokens carry the
//! same identity claims and differ in `token_type` and lifetime.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use pocket_core::{AuthConfig, User};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// Kind of token, embedded as the `token_type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// JWT Claims structure containing user identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// `access` or `refresh`
    pub token_type: TokenType,
    /// Token issuer
    pub iss: String,
    /// Subject - user ID
    pub sub: String,
    /// Login name at issuance time
    pub username: String,
    /// JWT ID - unique token identifier
    pub jti: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
}

/// JWT token generation and validation errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Expected {expected} token, got {found}")]
    WrongTokenType {
        expected: TokenType,
        found: TokenType,
    },

    #[error("{token_type} token lifetime of {lifetime_secs}s overflows the expiry timestamp")]
    LifetimeOverflow {
        token_type: TokenType,
        lifetime_secs: u64,
    },

    #[error("System time error: {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),
}

/// JWT Configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HMAC signing (must be at least 256 bits)
    pub secret: String,
    /// Token issuer identifier
    pub issuer: String,
    /// Access token expiration time in seconds (default: 300 = 5 minutes)
    pub access_expiration_secs: u64,
    /// Refresh token expiration time in seconds (default: 86400 = 1 day)
    pub refresh_expiration_secs: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

impl From<&AuthConfig> for JwtConfig {
    fn from(auth: &AuthConfig) -> Self {
        Self {
            secret: auth.jwt_secret.clone(),
            issuer: auth.issuer.clone(),
            access_expiration_secs: auth.access_expiration_secs,
            refresh_expiration_secs: auth.refresh_expiration_secs,
        }
    }
}

/// Access/refresh token pair returned to a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Signs and validates tokens with a fixed key
#[derive(Clone)]
pub struct TokenIssuer {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.config.issuer)
            .field("access_expiration_secs", &self.config.access_expiration_secs)
            .field("refresh_expiration_secs", &self.config.refresh_expiration_secs)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Issue a fresh access/refresh pair for `user`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pocket_api::auth::jwt::{JwtConfig, TokenIssuer, TokenType};
    /// use pocket_core::User;
    ///
    /// let issuer = TokenIssuer::new(JwtConfig::default());
    /// let user = User::new(
    ///     "alice".into(), "hash".into(), "Alice".into(), "A".into(),
    ///     Some("a@x.com".into()), None,
    /// );
    /// let pair = issuer.issue(&user).expect("Failed to issue tokens");
    /// let claims = issuer.decode(&pair.access, TokenType::Access).expect("Invalid token");
    /// assert_eq!(claims.sub, user.id.to_string());
    /// ```
    pub fn issue(&self, user: &User) -> Result<TokenPair, JwtError> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        self.issue_at(user, now)
    }

    fn issue_at(&self, user: &User, now: u64) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access: self.sign(user, TokenType::Access, now, self.config.access_expiration_secs)?,
            refresh: self.sign(user, TokenType::Refresh, now, self.config.refresh_expiration_secs)?,
        })
    }

    fn sign(
        &self,
        user: &User,
        token_type: TokenType,
        now: u64,
        lifetime_secs: u64,
    ) -> Result<String, JwtError> {
        let exp = now
            .checked_add(lifetime_secs)
            .ok_or(JwtError::LifetimeOverflow {
                token_type,
                lifetime_secs,
            })?;

        let claims = Claims {
            token_type,
            iss: self.config.issuer.clone(),
            sub: user.id.to_string(),
            username: user.username.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate `token` and require it to be of `expected` type
    pub fn decode(&self, token: &str, expected: TokenType) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken,
            }
        })?;

        let claims = token_data.claims;
        if claims.token_type != expected {
            return Err(JwtError::WrongTokenType {
                expected,
                found: claims.token_type,
            });
        }

        Ok(claims)
    }
}
