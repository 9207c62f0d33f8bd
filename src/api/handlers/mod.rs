//! HTTP request handlers.

mod auth;
mod conversations;
mod system;
mod tasks;

#[cfg(test)]
mod auth_test;
#[cfg(test)]
mod conversations_test;

pub use auth::*;
pub use conversations::*;
pub use system::*;
pub use tasks::*;

use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::DbError;

/// Error payload returned by every failing endpoint.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Status + body pair used as the rejection type throughout the API.
pub type HandlerError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn error(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Fallback mapping for database errors a handler has no special case for.
pub(crate) fn internal_error(e: DbError) -> HandlerError {
    error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// The bearer token authenticates a user; the path names one. They must
/// be the same user.
pub(crate) fn ensure_path_user(auth_user_id: &str, path_user_id: &str) -> Result<(), HandlerError> {
    if auth_user_id == path_user_id {
        Ok(())
    } else {
        Err(error(
            StatusCode::FORBIDDEN,
            "Token does not match requested user",
        ))
    }
}
