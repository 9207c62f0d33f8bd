//! System liveness handlers.

use axum::Json;
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

/// Root banner response
#[derive(Serialize, ToSchema)]
pub struct RootResponse {
    #[schema(example = "Todo chatbot API is running")]
    pub message: String,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses((status = 200, description = "Service banner", body = RootResponse))
)]
#[instrument]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Todo chatbot API is running".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Health check successful", body = HealthResponse))
)]
#[instrument]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
