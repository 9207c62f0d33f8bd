//! MCP tool parameter types and shared helpers, organized by entity.
//!
//! The `#[tool]` methods themselves live on `McpServer`.

mod conversations;
mod tasks;

#[cfg(test)]
mod tasks_test;

pub use conversations::*;
pub use tasks::*;

use rmcp::ErrorData as McpError;

use crate::db::DbError;

/// Default and maximum page sizes for list tools.
pub(crate) fn apply_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(10).min(20)
}

/// Map a database error to an MCP error payload.
pub(crate) fn map_db_error(e: DbError) -> McpError {
    match e {
        DbError::NotFound { .. } => {
            McpError::resource_not_found(e.to_string(), None)
        }
        DbError::Validation { .. } | DbError::AlreadyExists { .. } => {
            McpError::invalid_params(e.to_string(), None)
        }
        _ => McpError::internal_error(e.to_string(), None),
    }
}
