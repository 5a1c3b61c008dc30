use crate::error::AppError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bcrypt::{hash, verify};
use sha2::{Digest, Sha256};

/// Lowest work factor bcrypt accepts.
pub const MIN_HASH_COST: u32 = 4;

/// Highest work factor bcrypt accepts.
pub const MAX_HASH_COST: u32 = 31;

/// bcrypt only reads the first 72 bytes of its input, so the password is
/// condensed to a 44-byte SHA-256 digest first and every byte counts.
fn prehash(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    STANDARD.encode(hasher.finalize())
}

/// Produces a salted bcrypt digest of `password` at the given cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(prehash(password), cost)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(prehash(password), hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}
