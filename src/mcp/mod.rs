//! MCP server exposing task and conversation tools.
//!
//! The tool surface mirrors the HTTP API: every tool takes an explicit
//! `user_id` and runs the same ownership-scoped repository operations.

mod server;
mod service;
mod tools;

pub use server::McpServer;
pub use service::create_mcp_service;
