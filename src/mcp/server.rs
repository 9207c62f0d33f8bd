//! MCP server implementation.
//!
//! One `#[tool]` method per operation, mirroring the HTTP surface; the
//! parameter structs live in `tools/`, organized by entity. Every tool
//! takes an explicit `user_id` and runs the same ownership-scoped
//! repository calls as the HTTP handlers.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde_json::json;

use crate::db::utils::default_conversation_title;
use crate::db::{
    Conversation, ConversationQuery, ConversationRepository, ConversationStatus, Database,
    MessageRepository, PageSort, Task, TaskPriority, TaskQuery, TaskRepository, TaskStatus,
};

use super::tools::{
    CompleteTaskParams, CreateConversationParams, CreateTaskParams, DeleteTaskParams,
    GetConversationMessagesParams, GetTaskParams, ListConversationsParams, ListTasksParams,
    UpdateTaskParams, apply_limit, map_db_error,
};

/// MCP server over the shared database.
///
/// Generic over `D: Database` like the HTTP handlers.
#[derive(Clone)]
pub struct McpServer<D: Database> {
    db: Arc<D>,
    tool_router: ToolRouter<Self>,
}

impl<D: Database + 'static> McpServer<D> {
    /// Create a new MCP server with the given database.
    pub fn new(db: Arc<D>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            db,
        }
    }
}

#[tool_router]
impl<D: Database + 'static> McpServer<D> {
    // ------------------------------------------------------------------
    // Task tools
    // ------------------------------------------------------------------

    #[tool(
        description = "List a user's tasks, newest first. Filter by status bucket ('all', 'pending', 'completed') or priority."
    )]
    pub async fn list_tasks(
        &self,
        params: Parameters<ListTasksParams>,
    ) -> Result<CallToolResult, McpError> {
        let query = TaskQuery {
            page: PageSort {
                limit: Some(apply_limit(params.0.limit)),
                offset: params.0.offset,
                ..Default::default()
            },
            status: params.0.status.clone(),
            priority: params.0.priority.clone(),
        };

        let result = self
            .db
            .tasks()
            .list(&params.0.user_id, Some(&query))
            .await
            .map_err(map_db_error)?;

        let response = json!({
            "items": result.items,
            "total": result.total,
            "limit": result.limit,
            "offset": result.offset,
        });

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&response).unwrap_or_default(),
        )]))
    }

    #[tool(description = "Get one of a user's tasks by ID with full details.")]
    pub async fn get_task(
        &self,
        params: Parameters<GetTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        let task = self
            .db
            .tasks()
            .get(&params.0.task_id, &params.0.user_id)
            .await
            .map_err(map_db_error)?;

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&task).unwrap_or_default(),
        )]))
    }

    #[tool(
        description = "Create a task for a user. Title defaults to empty, priority to 'medium', status to 'pending'."
    )]
    pub async fn create_task(
        &self,
        params: Parameters<CreateTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        let priority = match &params.0.priority {
            Some(p) => p.parse::<TaskPriority>().map_err(|e| {
                McpError::invalid_params("invalid_priority", Some(json!({"error": e})))
            })?,
            None => TaskPriority::Medium,
        };

        let task = Task {
            id: String::new(), // Will be generated by the repository
            user_id: params.0.user_id.clone(),
            conversation_id: params.0.conversation_id.clone(),
            title: params.0.title.clone().unwrap_or_default(),
            description: params.0.description.clone().unwrap_or_default(),
            status: TaskStatus::Pending,
            priority,
            deadline: params.0.deadline.clone(),
            tags: params.0.tags.clone().unwrap_or_default(),
            created_at: String::new(),
            updated_at: String::new(),
            completed_at: None,
        };

        let created = self.db.tasks().create(&task).await.map_err(map_db_error)?;

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&created).unwrap_or_default(),
        )]))
    }

    #[tool(
        description = "Update a user's task. Only provided fields change; a status change to 'completed' sets completed_at, any other status clears it."
    )]
    pub async fn update_task(
        &self,
        params: Parameters<UpdateTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut task = self
            .db
            .tasks()
            .get(&params.0.task_id, &params.0.user_id)
            .await
            .map_err(map_db_error)?;

        if let Some(title) = &params.0.title {
            task.title = title.clone();
        }
        if let Some(description) = &params.0.description {
            task.description = description.clone();
        }
        if let Some(status_str) = &params.0.status {
            let status = status_str.parse::<TaskStatus>().map_err(|e| {
                McpError::invalid_params("invalid_status", Some(json!({"error": e})))
            })?;
            task.set_status(status);
        }
        if let Some(priority_str) = &params.0.priority {
            task.priority = priority_str.parse::<TaskPriority>().map_err(|e| {
                McpError::invalid_params("invalid_priority", Some(json!({"error": e})))
            })?;
        }
        if let Some(deadline) = &params.0.deadline {
            task.deadline = Some(deadline.clone());
        }
        if let Some(tags) = &params.0.tags {
            task.tags = tags.clone();
        }

        let updated = self.db.tasks().update(&task).await.map_err(map_db_error)?;

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&updated).unwrap_or_default(),
        )]))
    }

    #[tool(
        description = "Mark a user's task as completed. Shortcut for update_task with status='completed'; sets completed_at."
    )]
    pub async fn complete_task(
        &self,
        params: Parameters<CompleteTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut task = self
            .db
            .tasks()
            .get(&params.0.task_id, &params.0.user_id)
            .await
            .map_err(map_db_error)?;

        task.set_status(TaskStatus::Completed);

        let completed = self.db.tasks().update(&task).await.map_err(map_db_error)?;

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&completed).unwrap_or_default(),
        )]))
    }

    #[tool(description = "Delete a user's task permanently.")]
    pub async fn delete_task(
        &self,
        params: Parameters<DeleteTaskParams>,
    ) -> Result<CallToolResult, McpError> {
        self.db
            .tasks()
            .delete(&params.0.task_id, &params.0.user_id)
            .await
            .map_err(map_db_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Task {} deleted successfully",
            params.0.task_id
        ))]))
    }

    // ------------------------------------------------------------------
    // Conversation tools
    // ------------------------------------------------------------------

    #[tool(description = "List a user's conversations, most recently updated first.")]
    pub async fn list_conversations(
        &self,
        params: Parameters<ListConversationsParams>,
    ) -> Result<CallToolResult, McpError> {
        let query = ConversationQuery {
            page: PageSort {
                limit: Some(apply_limit(params.0.limit)),
                offset: params.0.offset,
                sort_by: params.0.sort_by.clone(),
                sort_order: None,
            },
        };

        let result = self
            .db
            .conversations()
            .list(&params.0.user_id, Some(&query))
            .await
            .map_err(map_db_error)?;

        let response = json!({
            "items": result.items,
            "total": result.total,
            "limit": result.limit,
            "offset": result.offset,
        });

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&response).unwrap_or_default(),
        )]))
    }

    #[tool(description = "Start a new conversation for a user.")]
    pub async fn create_conversation(
        &self,
        params: Parameters<CreateConversationParams>,
    ) -> Result<CallToolResult, McpError> {
        let title = match &params.0.title {
            Some(title) if !title.is_empty() => title.clone(),
            _ => default_conversation_title(),
        };

        let conversation = Conversation {
            id: String::new(), // Will be generated by the repository
            user_id: params.0.user_id.clone(),
            title,
            status: ConversationStatus::Active,
            created_at: String::new(),
            updated_at: String::new(),
        };

        let created = self
            .db
            .conversations()
            .create(&conversation)
            .await
            .map_err(map_db_error)?;

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&created).unwrap_or_default(),
        )]))
    }

    #[tool(
        description = "Read a conversation's messages oldest-first. A conversation the user does not own reads as empty."
    )]
    pub async fn get_conversation_messages(
        &self,
        params: Parameters<GetConversationMessagesParams>,
    ) -> Result<CallToolResult, McpError> {
        let page = PageSort {
            limit: Some(apply_limit(params.0.limit)),
            offset: params.0.offset,
            ..Default::default()
        };

        let result = self
            .db
            .messages()
            .list_for_conversation(&params.0.conversation_id, &params.0.user_id, &page)
            .await
            .map_err(map_db_error)?;

        let response = json!({
            "items": result.items,
            "total": result.total,
            "limit": result.limit,
            "offset": result.offset,
        });

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&response).unwrap_or_default(),
        )]))
    }
}

#[tool_handler]
impl<D: Database + 'static> ServerHandler for McpServer<D> {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.instructions = Some(
            "Taskchat MCP server - manage a user's tasks and conversations".to_string(),
        );
        info
    }
}
