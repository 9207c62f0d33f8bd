//! Application state for the API server.

use std::sync::Arc;

use crate::auth::TokenManager;
use crate::db::Database;

/// Shared application state.
///
/// Generic over `D: Database` so handlers never name a concrete storage
/// backend; the binary injects SQLite, tests inject an in-memory pool.
pub struct AppState<D: Database> {
    db: Arc<D>,
    tokens: TokenManager,
}

// Manual Clone impl - we only need Arc to be cloneable, not D.
impl<D: Database> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            tokens: self.tokens.clone(),
        }
    }
}

impl<D: Database> AppState<D> {
    pub fn new(db: D, tokens: TokenManager) -> Self {
        Self {
            db: Arc::new(db),
            tokens,
        }
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &D {
        &self.db
    }

    /// Get a cloned Arc to the database, for services that outlive a
    /// single request (the MCP session factory).
    pub fn db_arc(&self) -> Arc<D> {
        Arc::clone(&self.db)
    }

    /// Get the token signing/verification policy.
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }
}
