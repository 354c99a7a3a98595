/// Password hashing and verification using Argon2id
///
/// Stored hashes are PHC strings carrying the algorithm, parameters and salt,
/// so verification needs nothing but the stored value:
/// - Algorithm: Argon2id
/// - Memory: 64 MB (default)
/// - Iterations: 3
/// - Parallelism: 4 lanes
/// - Salt: 16 bytes random
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),

    #[error("Failed to verify password: {0}")]
    VerificationFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Password hashing configuration
///
/// Increasing memory or iterations improves resistance to offline attacks
/// but slows down every registration and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    /// Memory cost in KB (default: 65536 = 64 MB)
    pub memory_cost: u32,
    /// Time cost (iterations, default: 3)
    pub time_cost: u32,
    /// Parallelism (lanes, default: 4)
    pub parallelism: u32,
    /// Output length in bytes (default: 32)
    pub output_len: Option<usize>,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: 65536, // 64 MB
            time_cost: 3,
            parallelism: 4,
            output_len: Some(32),
        }
    }
}

impl PasswordConfig {
    /// Smallest parameters Argon2 accepts; only for tests and local tooling
    pub fn insecure_fast() -> Self {
        Self {
            memory_cost: 8,
            time_cost: 1,
            parallelism: 1,
            output_len: Some(32),
        }
    }

    fn to_params(&self) -> Result<Params, PasswordError> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            self.output_len,
        )
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }
}

/// Hash a plaintext password using Argon2id with default parameters
///
/// # Example
///
/// ```no_run
/// use pocket_core::password::hash_password;
///
/// let hash = hash_password("secret1").expect("Failed to hash password");
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash_password_with_config(password, &PasswordConfig::default())
}

/// Hash a password with custom configuration
///
/// Returns a PHC string that is safe to store; the plaintext is not retained.
pub fn hash_password_with_config(
    password: &str,
    config: &PasswordConfig,
) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = config.to_params()?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verify a plaintext password against a stored hash
///
/// * `Ok(true)` - Password matches
/// * `Ok(false)` - Password does not match
/// * `Err(PasswordError)` - The stored hash is unusable
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    // Parameters come from the PHC string, not from the default instance
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
    }
}
