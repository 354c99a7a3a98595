//! API error handling
//!
//! Client errors are rendered as a field-error map: each key is a request
//! field (or `non_field_errors`) and each value a list of messages. Server
//! errors never expose their cause; it goes to the log instead.

use crate::auth::jwt::JwtError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pocket_core::{FieldErrors, StoreError};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

pub const MSG_USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Server error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Human-readable message
    pub detail: String,
}

impl ApiError {
    pub fn internal_error() -> Self {
        Self {
            detail: "Internal server error".to_string(),
        }
    }
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request data failed validation
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Credentials were rejected
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    /// Field errors a client would see, if this is a client error
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            AppError::Validation(errors) => Some(errors.clone()),
            AppError::Auth(message) => Some(FieldErrors::non_field(message.clone())),
            AppError::Internal(_) | AppError::Database(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            AppError::Auth(message) => {
                (StatusCode::BAD_REQUEST, Json(FieldErrors::non_field(message))).into_response()
            }
            AppError::Internal(msg) => {
                error!(error = %msg, "Internal error");
                internal_error_response()
            }
            AppError::Database(msg) => {
                error!(error = %msg, "Database operation failed");
                internal_error_response()
            }
        }
    }
}

fn internal_error_response() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiError::internal_error())).into_response()
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(FieldErrors::non_field(rejection.body_text()))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UsernameTaken(_) => {
                AppError::Validation(FieldErrors::single("username", MSG_USERNAME_TAKEN))
            }
            StoreError::ContactInvariant(username) => {
                error!(
                    username = %username,
                    "Contact-method invariant violated after validation passed"
                );
                AppError::Internal(format!("contact invariant violated for '{username}'"))
            }
            StoreError::Database(msg) => AppError::Database(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        AppError::Internal(format!("Token issuance failed: {err}"))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
