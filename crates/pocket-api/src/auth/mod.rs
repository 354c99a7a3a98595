//! Authentication module
//!
//! - Token issuance and validation (HS256 JWT access/refresh pairs)
//! - Authentication service running the register and login pipelines
//!
//! Password hashing and credential checks live in `pocket_core`.

pub mod jwt;
pub mod service;

pub use jwt::{Claims, JwtConfig, JwtError, TokenIssuer, TokenPair, TokenType};
pub use service::{AuthResponse, AuthService, LoginRequest, RegisterRequest};
