//! Password hashing with bcrypt.

use super::{AuthError, AuthResult};

/// bcrypt truncates input beyond 72 bytes, so longer passwords are
/// rejected outright instead of being silently weakened.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// True when the password's UTF-8 encoding exceeds the bcrypt limit.
pub fn exceeds_password_limit(password: &str) -> bool {
    password.len() > MAX_PASSWORD_BYTES
}

/// Hash a password for storage. Fails on over-long input.
pub fn hash_password(password: &str) -> AuthResult<String> {
    if exceeds_password_limit(password) {
        return Err(AuthError::PasswordTooLong {
            limit: MAX_PASSWORD_BYTES,
        });
    }

    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| AuthError::Hashing {
        message: e.to_string(),
    })
}

/// Check a password against a stored hash.
///
/// Callers are expected to have applied the length limit already (the
/// login path rejects over-long passwords before ever reaching here);
/// a malformed stored hash reads as a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    bcrypt::verify(password, password_hash).unwrap_or(false)
}
