//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;

use super::handlers::{HandlerError, error};
use super::state::AppState;
use crate::db::Database;

/// The authenticated caller, resolved from the `Authorization` header.
///
/// Rejects with 401 when the header is missing or the token does not
/// verify. Matching the subject against a path-supplied user id is the
/// handler's job (a mismatch is 403, not 401).
pub struct AuthUser(pub String);

impl<D: Database + 'static> FromRequestParts<AppState<D>> for AuthUser {
    type Rejection = HandlerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<D>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Missing authorization header"))?;

        let user_id = state
            .tokens()
            .verify(header)
            .map_err(|_| error(StatusCode::UNAUTHORIZED, "Invalid token"))?;

        Ok(AuthUser(user_id))
    }
}
