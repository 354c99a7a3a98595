//! Authentication API handlers
//!
//! Both endpoints take the raw JSON body so that unparseable requests are
//! reported in the same field-error shape as validation failures.

use crate::audit::{audit_log, claimed_username, AuditEvent, ClientInfo};
use crate::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use pocket_core::FieldErrors;
use serde_json::Value;
use std::sync::Arc;

/// Register a new user account
///
/// Creates the user and returns it together with a fresh token pair.
/// At least one of `email` or `phoneNumber` is required.
///
/// # Responses
///
/// * `201 Created` - User registered, tokens issued
/// * `400 Bad Request` - Field errors, including a taken username
/// * `500 Internal Server Error` - Server error
#[utoipa::path(
    post,
    path = "/auth/register/",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Invalid input", body = FieldErrors),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let client = ClientInfo::from_headers(&headers);
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            let err = AppError::from(rejection);
            audit_registration_failure(None, &err, client);
            return Err(err);
        }
    };

    match state.auth_service().register(&body).await {
        Ok(response) => {
            audit_log(&AuditEvent::RegistrationSuccess {
                user_id: response.user.id,
                username: response.user.username.clone(),
                client,
            });
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(err) => {
            audit_registration_failure(claimed_username(&body), &err, client);
            Err(err)
        }
    }
}

/// Login with username and password
///
/// # Responses
///
/// * `200 OK` - Credentials accepted, tokens issued
/// * `400 Bad Request` - Missing or rejected credentials
/// * `500 Internal Server Error` - Server error
#[utoipa::path(
    post,
    path = "/auth/login/",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid credentials", body = FieldErrors),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let client = ClientInfo::from_headers(&headers);
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            let err = AppError::from(rejection);
            audit_login_failure(None, &err, client);
            return Err(err);
        }
    };

    match state.auth_service().login(&body).await {
        Ok(response) => {
            audit_log(&AuditEvent::LoginSuccess {
                user_id: response.user.id,
                username: response.user.username.clone(),
                client,
            });
            Ok(Json(response))
        }
        Err(err) => {
            audit_login_failure(claimed_username(&body), &err, client);
            Err(err)
        }
    }
}

fn audit_registration_failure(username: Option<String>, err: &AppError, client: ClientInfo) {
    let fields = err
        .field_errors()
        .map(|e| e.fields().map(str::to_string).collect())
        .unwrap_or_default();

    audit_log(&AuditEvent::RegistrationFailure {
        username,
        fields,
        reason: failure_reason(err),
        client,
    });
}

fn audit_login_failure(username: Option<String>, err: &AppError, client: ClientInfo) {
    audit_log(&AuditEvent::LoginFailure {
        username,
        reason: failure_reason(err),
        client,
    });
}

// Internal error text stays in the error log, not the audit trail
fn failure_reason(err: &AppError) -> String {
    match err {
        AppError::Validation(_) => "validation failed".to_string(),
        AppError::Auth(message) => message.clone(),
        AppError::Internal(_) | AppError::Database(_) => "internal error".to_string(),
    }
}
