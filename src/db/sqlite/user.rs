//! SQLite UserRepository implementation.

use sqlx::{Row, SqlitePool};

use crate::db::utils::{current_timestamp, generate_entity_id};
use crate::db::{DbError, DbResult, User, UserRepository};

/// SQLx-backed user repository.
pub struct SqliteUserRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl UserRepository for SqliteUserRepository<'_> {
    async fn create(&self, user: &User) -> DbResult<User> {
        let id = if user.id.is_empty() {
            generate_entity_id()
        } else {
            user.id.clone()
        };
        let now = current_timestamp();

        sqlx::query(
            r#"
            INSERT INTO user (id, email, username, password_hash, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|d| d.is_unique_violation())
            {
                DbError::AlreadyExists {
                    entity_type: "User".to_string(),
                    key: user.email.clone(),
                }
            } else {
                DbError::Database {
                    message: e.to_string(),
                }
            }
        })?;

        Ok(User {
            id,
            email: user.email.clone(),
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            is_active: user.is_active,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, username, password_hash, is_active, created_at, updated_at
             FROM user WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| DbError::Database {
            message: e.to_string(),
        })?;

        Ok(row.as_ref().map(row_to_user))
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
