//! Registration, login, and token verification handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::api::extract::AuthUser;
use crate::api::state::AppState;
use crate::auth::{MAX_PASSWORD_BYTES, exceeds_password_limit, hash_password, verify_password};
use crate::db::{Database, DbError, User, UserRepository};

use super::{ErrorResponse, HandlerError, error, internal_error};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub password: String,
    #[schema(example = "alice")]
    pub username: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub user_id: String,
    pub email: String,
    pub username: Option<String>,
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub user_id: String,
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
}

#[derive(Serialize, ToSchema)]
pub struct VerifyResponse {
    pub user_id: String,
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Duplicate email or oversized password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn register<D: Database>(
    State(state): State<AppState<D>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, HandlerError> {
    // bcrypt limitation: reject before hashing rather than truncate.
    if exceeds_password_limit(&req.password) {
        return Err(error(
            StatusCode::BAD_REQUEST,
            format!("Password cannot be longer than {} bytes", MAX_PASSWORD_BYTES),
        ));
    }

    let existing = state
        .db()
        .users()
        .get_by_email(&req.email)
        .await
        .map_err(internal_error)?;
    if existing.is_some() {
        return Err(error(StatusCode::BAD_REQUEST, "Email already registered"));
    }

    let password_hash =
        hash_password(&req.password).map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let user = User {
        id: String::new(),
        email: req.email,
        username: Some(req.username),
        password_hash,
        is_active: true,
        created_at: String::new(),
        updated_at: String::new(),
    };

    let created = state.db().users().create(&user).await.map_err(|e| match e {
        // Lost the race against a concurrent registration for the same email.
        DbError::AlreadyExists { .. } => error(StatusCode::BAD_REQUEST, "Email already registered"),
        _ => internal_error(e),
    })?;

    let access_token = state
        .tokens()
        .issue(&created.id)
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    info!(user_id = %created.id, "user registered");

    Ok(Json(RegisterResponse {
        user_id: created.id,
        email: created.email,
        username: created.username,
        access_token,
        token_type: "bearer".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Bad credentials or oversized password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn login<D: Database>(
    State(state): State<AppState<D>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HandlerError> {
    if exceeds_password_limit(&req.password) {
        return Err(error(
            StatusCode::UNAUTHORIZED,
            format!("Password cannot be longer than {} bytes", MAX_PASSWORD_BYTES),
        ));
    }

    let user = state
        .db()
        .users()
        .get_by_email(&req.email)
        .await
        .map_err(internal_error)?;

    // One rejection for both unknown email and bad password.
    let user = match user {
        Some(user) if verify_password(&req.password, &user.password_hash) => user,
        _ => {
            return Err(error(
                StatusCode::UNAUTHORIZED,
                "Incorrect email or password",
            ));
        }
    };

    let access_token = state
        .tokens()
        .issue(&user.id)
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        user_id: user.id,
        access_token,
        token_type: "bearer".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/auth/verify",
    tag = "auth",
    responses(
        (status = 200, description = "Token is valid", body = VerifyResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn verify<D: Database>(AuthUser(user_id): AuthUser) -> Json<VerifyResponse> {
    Json(VerifyResponse { user_id })
}
