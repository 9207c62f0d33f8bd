//! Authentication error types.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from password hashing or token handling.
#[derive(Error, Diagnostic, Debug)]
pub enum AuthError {
    #[error("Password cannot be longer than {limit} bytes")]
    #[diagnostic(code(taskchat::auth::password_too_long))]
    PasswordTooLong { limit: usize },

    #[error("Password hashing failed: {message}")]
    #[diagnostic(code(taskchat::auth::hashing))]
    Hashing { message: String },

    #[error("Invalid token: {message}")]
    #[diagnostic(code(taskchat::auth::invalid_token))]
    InvalidToken { message: String },

    #[error("Token signing failed: {message}")]
    #[diagnostic(code(taskchat::auth::signing))]
    Signing { message: String },
}

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;
