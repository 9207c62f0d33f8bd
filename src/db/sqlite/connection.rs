//! SQLite pool setup and migration management.

use std::path::Path;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::{
    SqliteConversationRepository, SqliteMessageRepository, SqliteTaskRepository,
    SqliteUserRepository,
};
use crate::db::{Database, DbError, DbResult};

/// sqlx-backed SQLite database.
///
/// Holds a connection pool shared by every request; each query checks a
/// connection out and returns it on completion, which is what gives
/// handlers their per-request scoped session.
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Open a database file, creating it if missing.
    pub async fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// The pool is pinned to a single long-lived connection: every
    /// in-memory SQLite connection is its own database, so letting the
    /// pool open a second one would lose the schema.
    pub async fn in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::new().in_memory(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    /// Direct pool access for tests and advanced operations.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl Database for SqliteDatabase {
    type Users<'a> = SqliteUserRepository<'a>;
    type Conversations<'a> = SqliteConversationRepository<'a>;
    type Messages<'a> = SqliteMessageRepository<'a>;
    type Tasks<'a> = SqliteTaskRepository<'a>;

    async fn migrate(&self) -> DbResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Migration {
                message: e.to_string(),
            })
    }

    fn users(&self) -> Self::Users<'_> {
        SqliteUserRepository { pool: &self.pool }
    }

    fn conversations(&self) -> Self::Conversations<'_> {
        SqliteConversationRepository { pool: &self.pool }
    }

    fn messages(&self) -> Self::Messages<'_> {
        SqliteMessageRepository { pool: &self.pool }
    }

    fn tasks(&self) -> Self::Tasks<'_> {
        SqliteTaskRepository { pool: &self.pool }
    }
}
