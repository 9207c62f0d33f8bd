//! SQLite ConversationRepository implementation.

use std::str::FromStr;

use sqlx::{Row, SqlitePool};

use super::helpers::{build_limit_offset_clause, build_order_clause};
use crate::db::utils::{current_timestamp, generate_entity_id};
use crate::db::{
    Conversation, ConversationQuery, ConversationRepository, ConversationStatus, DbError, DbResult,
    ListResult,
};

/// SQLx-backed conversation repository.
pub struct SqliteConversationRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl ConversationRepository for SqliteConversationRepository<'_> {
    async fn create(&self, conversation: &Conversation) -> DbResult<Conversation> {
        let id = if conversation.id.is_empty() {
            generate_entity_id()
        } else {
            conversation.id.clone()
        };
        let now = current_timestamp();

        sqlx::query(
            r#"
            INSERT INTO conversation (id, user_id, title, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&conversation.user_id)
        .bind(&conversation.title)
        .bind(conversation.status.to_string())
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await
        .map_err(|e| DbError::Database {
            message: e.to_string(),
        })?;

        Ok(Conversation {
            id,
            created_at: now.clone(),
            updated_at: now,
            ..conversation.clone()
        })
    }

    async fn get(&self, id: &str, user_id: &str) -> DbResult<Conversation> {
        let row = sqlx::query(
            "SELECT id, user_id, title, status, created_at, updated_at
             FROM conversation WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| DbError::Database {
            message: e.to_string(),
        })?;

        let row = row.ok_or(DbError::NotFound {
            entity_type: "Conversation".to_string(),
            id: id.to_string(),
        })?;

        Ok(row_to_conversation(&row))
    }

    async fn list(
        &self,
        user_id: &str,
        query: Option<&ConversationQuery>,
    ) -> DbResult<ListResult<Conversation>> {
        let default_query = ConversationQuery::default();
        let query = query.unwrap_or(&default_query);
        let allowed_fields = ["updated_at", "created_at"];

        let order_clause = build_order_clause(&query.page, &allowed_fields, "updated_at");
        let limit_clause = build_limit_offset_clause(&query.page);

        let sql = format!(
            "SELECT id, user_id, title, status, created_at, updated_at
             FROM conversation WHERE user_id = ? {}{}",
            order_clause, limit_clause
        );

        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await
            .map_err(|e| DbError::Database {
                message: e.to_string(),
            })?;

        let items: Vec<Conversation> = rows.iter().map(row_to_conversation).collect();

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conversation WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| DbError::Database {
                message: e.to_string(),
            })?;

        Ok(ListResult {
            items,
            total: total as usize,
            limit: query.page.limit,
            offset: query.page.offset.unwrap_or(0),
        })
    }

    async fn update_title(&self, id: &str, user_id: &str, title: &str) -> DbResult<Conversation> {
        let now = current_timestamp();

        let result = sqlx::query(
            "UPDATE conversation SET title = ?, updated_at = ? WHERE id = ? AND user_id = ?",
        )
        .bind(title)
        .bind(&now)
        .bind(id)
        .bind(user_id)
        .execute(self.pool)
        .await
        .map_err(|e| DbError::Database {
            message: e.to_string(),
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                entity_type: "Conversation".to_string(),
                id: id.to_string(),
            });
        }

        self.get(id, user_id).await
    }
}

fn row_to_conversation(row: &sqlx::sqlite::SqliteRow) -> Conversation {
    Conversation {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        status: {
            let status_str: String = row.get("status");
            ConversationStatus::from_str(&status_str).unwrap_or_default()
        },
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
