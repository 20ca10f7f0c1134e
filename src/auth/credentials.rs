use crate::error::AppError;

/// Hashes a plaintext password into an opaque bcrypt verifier. The cost
/// factor is fixed; callers never tune it.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST).map_err(|e| AppError::Hashing(e.to_string()))
}

/// Checks a plaintext password against a stored verifier. A wrong password
/// or a malformed verifier both yield `false`; this never errors on mismatch.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}
