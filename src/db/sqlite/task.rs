//! SQLite TaskRepository implementation.

use std::str::FromStr;

use sqlx::{Row, SqlitePool};

use super::helpers::build_limit_offset_clause;
use crate::db::utils::{current_timestamp, generate_entity_id};
use crate::db::{
    DbError, DbResult, ListResult, Task, TaskPriority, TaskQuery, TaskRepository, TaskStatus,
};

const TASK_COLUMNS: &str = "id, user_id, conversation_id, title, description, status, priority, \
                            deadline, tags, created_at, updated_at, completed_at";

/// SQLx-backed task repository.
///
/// Every statement that touches an existing row carries a `user_id`
/// predicate alongside the task id.
pub struct SqliteTaskRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl TaskRepository for SqliteTaskRepository<'_> {
    async fn create(&self, task: &Task) -> DbResult<Task> {
        let id = if task.id.is_empty() {
            generate_entity_id()
        } else {
            task.id.clone()
        };
        let now = current_timestamp();

        let tags_json = serde_json::to_string(&task.tags).unwrap_or_else(|_| "[]".to_string());

        sqlx::query(
            r#"
            INSERT INTO task (id, user_id, conversation_id, title, description, status, priority,
                              deadline, tags, created_at, updated_at, completed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&task.user_id)
        .bind(&task.conversation_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.to_string())
        .bind(task.priority.to_string())
        .bind(&task.deadline)
        .bind(&tags_json)
        .bind(&now)
        .bind(&now)
        .bind(&task.completed_at)
        .execute(self.pool)
        .await
        .map_err(|e| DbError::Database {
            message: e.to_string(),
        })?;

        Ok(Task {
            id,
            created_at: now.clone(),
            updated_at: now,
            ..task.clone()
        })
    }

    async fn get(&self, id: &str, user_id: &str) -> DbResult<Task> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM task WHERE id = ? AND user_id = ?",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| DbError::Database {
            message: e.to_string(),
        })?;

        let row = row.ok_or(DbError::NotFound {
            entity_type: "Task".to_string(),
            id: id.to_string(),
        })?;

        Ok(row_to_task(&row))
    }

    async fn list(&self, user_id: &str, query: Option<&TaskQuery>) -> DbResult<ListResult<Task>> {
        let default_query = TaskQuery::default();
        let query = query.unwrap_or(&default_query);

        let mut conditions = vec!["user_id = ?".to_string()];
        let mut bind_values = vec![user_id.to_string()];

        // Status bucket: "pending" is anything not completed; unknown
        // buckets behave like "all".
        match query.status.as_deref() {
            Some("pending") => conditions.push("status != 'completed'".to_string()),
            Some("completed") => conditions.push("status = 'completed'".to_string()),
            _ => {}
        }

        if let Some(priority) = &query.priority {
            conditions.push("priority = ?".to_string());
            bind_values.push(priority.clone());
        }

        let where_clause = format!("WHERE {}", conditions.join(" AND "));
        let limit_clause = build_limit_offset_clause(&query.page);

        // Tasks are always listed newest-first; rowid breaks same-second ties.
        let sql = format!(
            "SELECT {} FROM task {} ORDER BY created_at DESC, rowid DESC{}",
            TASK_COLUMNS, where_clause, limit_clause
        );
        let count_sql = format!("SELECT COUNT(*) FROM task {}", where_clause);

        let mut query_builder = sqlx::query(&sql);
        for value in &bind_values {
            query_builder = query_builder.bind(value);
        }

        let rows = query_builder
            .fetch_all(self.pool)
            .await
            .map_err(|e| DbError::Database {
                message: e.to_string(),
            })?;

        let items: Vec<Task> = rows.iter().map(row_to_task).collect();

        let mut count_query = sqlx::query_scalar(&count_sql);
        for value in &bind_values {
            count_query = count_query.bind(value);
        }

        let total: i64 = count_query
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

    async fn list_for_conversation(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> DbResult<Vec<Task>> {
        // Silent ownership gate: an unowned conversation yields no tasks.
        let owned = sqlx::query("SELECT id FROM conversation WHERE id = ? AND user_id = ?")
            .bind(conversation_id)
            .bind(user_id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| DbError::Database {
                message: e.to_string(),
            })?;

        if owned.is_none() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(&format!(
            "SELECT {} FROM task WHERE conversation_id = ?",
            TASK_COLUMNS
        ))
        .bind(conversation_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| DbError::Database {
            message: e.to_string(),
        })?;

        Ok(rows.iter().map(row_to_task).collect())
    }

    async fn update(&self, task: &Task) -> DbResult<Task> {
        let now = current_timestamp();
        let tags_json = serde_json::to_string(&task.tags).unwrap_or_else(|_| "[]".to_string());

        let result = sqlx::query(
            r#"
            UPDATE task
            SET conversation_id = ?, title = ?, description = ?, status = ?, priority = ?,
                deadline = ?, tags = ?, completed_at = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&task.conversation_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.to_string())
        .bind(task.priority.to_string())
        .bind(&task.deadline)
        .bind(&tags_json)
        .bind(&task.completed_at)
        .bind(&now)
        .bind(&task.id)
        .bind(&task.user_id)
        .execute(self.pool)
        .await
        .map_err(|e| DbError::Database {
            message: e.to_string(),
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                entity_type: "Task".to_string(),
                id: task.id.clone(),
            });
        }

        Ok(Task {
            updated_at: now,
            ..task.clone()
        })
    }

    async fn delete(&self, id: &str, user_id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM task WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await
            .map_err(|e| DbError::Database {
                message: e.to_string(),
            })?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                entity_type: "Task".to_string(),
                id: id.to_string(),
            });
        }

        Ok(())
    }
}

/// Convert a database row to a Task model.
fn row_to_task(row: &sqlx::sqlite::SqliteRow) -> Task {
    Task {
        id: row.get("id"),
        user_id: row.get("user_id"),
        conversation_id: row.get("conversation_id"),
        title: row.get("title"),
        description: row.get("description"),
        status: {
            let status_str: String = row.get("status");
            TaskStatus::from_str(&status_str).unwrap_or_default()
        },
        priority: {
            let priority_str: String = row.get("priority");
            TaskPriority::from_str(&priority_str).unwrap_or_default()
        },
        deadline: row.get("deadline"),
        tags: {
            let tags_json: Option<String> = row.get("tags");
            tags_json
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default()
        },
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        completed_at: row.get("completed_at"),
    }
}
