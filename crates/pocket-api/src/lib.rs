//! Pocket API - HTTP server for user registration and login
//!
//! Exposes `POST /auth/register/` and `POST /auth/login/`, which return the
//! user plus a JWT access/refresh pair, along with a health check and the
//! OpenAPI document.

pub mod audit;
pub mod auth;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Build the application router over shared state
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .merge(routes::health_routes())
        .merge(routes::auth_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// An empty origin list allows any origin (development)
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Shared state for tests: in-memory store with fast password hashing
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> Arc<AppState> {
    let mut config = pocket_core::AppConfig::default();
    config.password = pocket_core::PasswordConfig::insecure_fast();
    Arc::new(AppState::in_memory(config))
}

/// Router over a fresh in-memory state, for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub fn create_router_for_testing() -> Router {
    create_router(create_test_state())
}
