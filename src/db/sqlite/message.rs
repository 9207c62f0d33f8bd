//! SQLite MessageRepository implementation.

use std::str::FromStr;

use sqlx::{Row, SqlitePool};

use super::helpers::build_limit_offset_clause;
use crate::db::utils::{current_timestamp, generate_entity_id};
use crate::db::{DbError, DbResult, ListResult, Message, MessageRepository, PageSort, SenderType};

/// SQLx-backed message repository.
///
/// Messages are reached through their conversation, so both operations
/// gate on the conversation's owner rather than carrying a user_id column
/// of their own.
pub struct SqliteMessageRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl SqliteMessageRepository<'_> {
    async fn conversation_owned(&self, conversation_id: &str, user_id: &str) -> DbResult<bool> {
        let row = sqlx::query("SELECT id FROM conversation WHERE id = ? AND user_id = ?")
            .bind(conversation_id)
            .bind(user_id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| DbError::Database {
                message: e.to_string(),
            })?;
        Ok(row.is_some())
    }
}

impl MessageRepository for SqliteMessageRepository<'_> {
    async fn create(&self, message: &Message, user_id: &str) -> DbResult<Message> {
        if !self
            .conversation_owned(&message.conversation_id, user_id)
            .await?
        {
            return Err(DbError::NotFound {
                entity_type: "Conversation".to_string(),
                id: message.conversation_id.clone(),
            });
        }

        let id = if message.id.is_empty() {
            generate_entity_id()
        } else {
            message.id.clone()
        };
        let now = current_timestamp();

        sqlx::query(
            r#"
            INSERT INTO message (id, conversation_id, sender_type, content, metadata, timestamp)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&message.conversation_id)
        .bind(message.sender_type.to_string())
        .bind(&message.content)
        .bind(&message.metadata)
        .bind(&now)
        .execute(self.pool)
        .await
        .map_err(|e| DbError::Database {
            message: e.to_string(),
        })?;

        // New activity bumps the conversation in updated_at-sorted listings.
        sqlx::query("UPDATE conversation SET updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(&message.conversation_id)
            .execute(self.pool)
            .await
            .map_err(|e| DbError::Database {
                message: e.to_string(),
            })?;

        Ok(Message {
            id,
            timestamp: now,
            ..message.clone()
        })
    }

    async fn list_for_conversation(
        &self,
        conversation_id: &str,
        user_id: &str,
        page: &PageSort,
    ) -> DbResult<ListResult<Message>> {
        // An unowned conversation reads as empty, not as an error.
        if !self.conversation_owned(conversation_id, user_id).await? {
            return Ok(ListResult::empty(page));
        }

        let limit_clause = build_limit_offset_clause(page);

        let sql = format!(
            "SELECT id, conversation_id, sender_type, content, metadata, timestamp
             FROM message WHERE conversation_id = ?
             ORDER BY timestamp ASC, rowid ASC{}",
            limit_clause
        );

        let rows = sqlx::query(&sql)
            .bind(conversation_id)
            .fetch_all(self.pool)
            .await
            .map_err(|e| DbError::Database {
                message: e.to_string(),
            })?;

        let items: Vec<Message> = rows.iter().map(row_to_message).collect();

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM message WHERE conversation_id = ?")
            .bind(conversation_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| DbError::Database {
                message: e.to_string(),
            })?;

        Ok(ListResult {
            items,
            total: total as usize,
            limit: page.limit,
            offset: page.offset.unwrap_or(0),
        })
    }
}

fn row_to_message(row: &sqlx::sqlite::SqliteRow) -> Message {
    Message {
        id: row.get("id"),
        conversation_id: row.get("conversation_id"),
        sender_type: {
            let sender_str: String = row.get("sender_type");
            SenderType::from_str(&sender_str).unwrap_or_default()
        },
        content: row.get("content"),
        metadata: row.get("metadata"),
        timestamp: row.get("timestamp"),
    }
}
