//! HTTP API server.

mod extract;
mod handlers;
mod routes;
mod state;

use std::net::IpAddr;

use miette::Diagnostic;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::auth::TokenManager;
use crate::db::Database;
use crate::mcp::create_mcp_service;

pub use extract::AuthUser;
pub use routes::create_router;
pub use state::AppState;

/// API server errors.
#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Failed to bind {addr}: {source}")]
    #[diagnostic(code(taskchat::api::bind))]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(taskchat::api::serve))]
    Serve(#[from] std::io::Error),
}

/// API server configuration
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".parse().expect("valid literal address"),
            port: 8000,
        }
    }
}

/// Initialize tracing subscriber with env filter
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskchat=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the API server with the given configuration.
///
/// Mounts the REST surface at the root and the MCP streamable-HTTP
/// service at `/mcp`, sharing one database.
pub async fn run<D: Database + 'static>(config: Config, db: D) -> Result<(), ApiError> {
    init_tracing();

    let state = AppState::new(db, TokenManager::from_env());
    let cancellation_token = CancellationToken::new();
    let mcp_service = create_mcp_service(state.db_arc(), cancellation_token.clone());

    let app = routes::create_router(state)
        .nest_service("/mcp", mcp_service)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ApiError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!("API server listening on http://{}", addr);

    let result = axum::serve(listener, app).await;
    cancellation_token.cancel();
    result?;

    Ok(())
}
