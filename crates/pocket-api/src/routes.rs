//! API route definitions

use crate::handlers::{auth, health};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Registration and login routes (public)
pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register/", post(auth::register_handler))
        .route("/auth/login/", post(auth::login_handler))
}

/// Health check routes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health::health_check))
}
