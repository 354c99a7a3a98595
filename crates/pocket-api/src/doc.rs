//! OpenAPI documentation
//!
//! [`ApiDoc`] describes the registration, login and health endpoints. It is
//! served at `/api-docs/openapi.json` with Swagger UI at `/swagger-ui`.

use crate::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::error::ApiError;
use crate::handlers::health::HealthResponse;
use pocket_core::{FieldErrors, PublicUser};
use utoipa::OpenApi;

/// OpenAPI document for the REST API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pocket API",
        description = "User registration and login with JWT access/refresh tokens.",
        license(name = "Apache-2.0", url = "https://www.apache.org/licenses/LICENSE-2.0.html")
    ),
    paths(
        crate::handlers::auth::register_handler,
        crate::handlers::auth::login_handler,
        crate::handlers::health::health_check,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        PublicUser,
        FieldErrors,
        ApiError,
        HealthResponse
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
