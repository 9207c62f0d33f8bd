//! MCP Streamable HTTP service creation.

use std::sync::Arc;

use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio_util::sync::CancellationToken;

use crate::db::Database;

use super::server::McpServer;

/// Create the MCP Streamable HTTP service.
///
/// Returns a tower service suitable for `Router::nest_service("/mcp", ..)`.
/// A fresh `McpServer` is created per MCP session over the shared pool.
pub fn create_mcp_service<D: Database + 'static>(
    db: Arc<D>,
    cancellation_token: CancellationToken,
) -> StreamableHttpService<McpServer<D>, LocalSessionManager> {
    let service_factory = move || -> Result<McpServer<D>, std::io::Error> {
        Ok(McpServer::new(Arc::clone(&db)))
    };

    let mut config = StreamableHttpServerConfig::default();
    config.sse_keep_alive = None;
    config.sse_retry = None;
    config.stateful_mode = true;
    config.cancellation_token = cancellation_token;

    StreamableHttpService::new(
        service_factory,
        LocalSessionManager::default().into(),
        config,
    )
}
