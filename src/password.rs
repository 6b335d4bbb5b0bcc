//! Salted password hashing (Argon2id, PHC string format).

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to hash password")]
pub struct PasswordError;

/// Hash a password using Argon2id with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError)
}

/// Verify a password against a stored hash. A malformed hash never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// Verified against when the email is unknown, so that branch costs one full
// Argon2 verification like a wrong password does. Matches no password; the
// parameters are `Argon2::default()`'s so the work equals a real hash.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$lLHgiGL5IVqXrNGFNpSk6A$+jz+EjXcVQHmrmowRedGd8dHLOTWRR/fpp4fmZcj31U";

/// Burns the same work as a real verification. Always returns `false`.
pub fn verify_dummy(password: &str) -> bool {
    let _ = verify_password(password, DUMMY_HASH);
    false
}
