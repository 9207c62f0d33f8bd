//! Task management handlers.
//!
//! Every route lives under `/api/{user_id}` and is double-gated: the
//! bearer token must verify and its subject must equal the path user id;
//! below that, every repository call carries the user id in its query
//! predicate.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use crate::api::extract::AuthUser;
use crate::api::state::AppState;
use crate::db::{
    Database, DbError, PageSort, Task, TaskPriority, TaskQuery, TaskRepository, TaskStatus,
};

use super::{ErrorResponse, HandlerError, ensure_path_user, error, internal_error};

// =============================================================================
// DTOs
// =============================================================================

#[derive(Serialize, ToSchema)]
pub struct TaskResponse {
    pub id: String,
    pub user_id: String,
    pub conversation_id: Option<String>,
    #[schema(example = "Buy milk")]
    pub title: String,
    pub description: String,
    #[schema(example = "pending")]
    pub status: String,
    #[schema(example = "medium")]
    pub priority: String,
    #[schema(example = "2026-09-01")]
    pub deadline: Option<String>,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub completed_at: Option<String>,
}

impl From<Task> for TaskResponse {
    fn from(t: Task) -> Self {
        Self {
            id: t.id,
            user_id: t.user_id,
            conversation_id: t.conversation_id,
            title: t.title,
            description: t.description,
            status: t.status.to_string(),
            priority: t.priority.to_string(),
            deadline: t.deadline,
            tags: t.tags,
            created_at: t.created_at,
            updated_at: t.updated_at,
            completed_at: t.completed_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    #[schema(example = "Buy milk")]
    pub title: Option<String>,
    pub description: Option<String>,
    /// "low" | "medium" | "high"; anything else falls back to "medium".
    #[schema(example = "medium")]
    pub priority: Option<String>,
    /// Conversation this task came out of, if any.
    pub conversation_id: Option<String>,
    #[schema(example = "2026-09-01")]
    pub deadline: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Partial update: only provided fields are touched.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = "in_progress")]
    pub status: Option<String>,
    #[schema(example = "high")]
    pub priority: Option<String>,
    pub conversation_id: Option<String>,
    pub deadline: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateTaskRequest {
    fn merge_into(self, target: &mut Task) {
        if let Some(title) = self.title {
            target.title = title;
        }
        if let Some(description) = self.description {
            target.description = description;
        }
        if let Some(status_str) = self.status
            && let Ok(status) = status_str.parse()
        {
            // Keeps completed_at consistent with the new status.
            target.set_status(status);
        }
        if let Some(priority_str) = self.priority
            && let Ok(priority) = priority_str.parse()
        {
            target.priority = priority;
        }
        if let Some(conversation_id) = self.conversation_id {
            target.conversation_id = Some(conversation_id);
        }
        if let Some(deadline) = self.deadline {
            target.deadline = Some(deadline);
        }
        if let Some(tags) = self.tags {
            target.tags = tags;
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTaskStatusRequest {
    #[schema(example = "completed")]
    pub status: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListTasksQuery {
    /// Status bucket: "all" (default), "pending", "completed"
    #[param(example = "pending")]
    pub status: Option<String>,
    /// Exact-match priority filter (low, medium, high)
    #[param(example = "high")]
    pub priority: Option<String>,
    /// Maximum number of items to return
    #[param(example = 20)]
    pub limit: Option<usize>,
    /// Number of items to skip
    #[param(example = 0)]
    pub offset: Option<usize>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedTasks {
    pub items: Vec<TaskResponse>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    post,
    path = "/api/{user_id}/tasks",
    tag = "tasks",
    params(("user_id" = String, Path, description = "Owning user ID")),
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token does not match user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth, req))]
pub async fn create_task<D: Database>(
    State(state): State<AppState<D>>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), HandlerError> {
    ensure_path_user(&auth.0, &user_id)?;

    let priority = req
        .priority
        .as_deref()
        .and_then(|p| TaskPriority::from_str(p).ok())
        .unwrap_or_default();

    let task = Task {
        id: String::new(), // Repository will generate this
        user_id,
        conversation_id: req.conversation_id,
        title: req.title.unwrap_or_default(),
        description: req.description.unwrap_or_default(),
        status: TaskStatus::Pending,
        priority,
        deadline: req.deadline,
        tags: req.tags.unwrap_or_default(),
        created_at: String::new(), // Repository will generate this
        updated_at: String::new(),
        completed_at: None,
    };

    let created = state
        .db()
        .tasks()
        .create(&task)
        .await
        .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/api/{user_id}/tasks",
    tag = "tasks",
    params(
        ("user_id" = String, Path, description = "Owning user ID"),
        ListTasksQuery
    ),
    responses(
        (status = 200, description = "Paginated list of tasks, newest first", body = PaginatedTasks),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token does not match user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn list_tasks<D: Database>(
    State(state): State<AppState<D>>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<PaginatedTasks>, HandlerError> {
    ensure_path_user(&auth.0, &user_id)?;

    let db_query = TaskQuery {
        page: PageSort {
            limit: Some(query.limit.unwrap_or(20)),
            offset: query.offset,
            ..Default::default()
        },
        status: query.status,
        priority: query.priority,
    };

    let result = state
        .db()
        .tasks()
        .list(&user_id, Some(&db_query))
        .await
        .map_err(internal_error)?;

    let items: Vec<TaskResponse> = result.items.into_iter().map(TaskResponse::from).collect();

    Ok(Json(PaginatedTasks {
        items,
        total: result.total,
        limit: result.limit.unwrap_or(20),
        offset: result.offset,
    }))
}

#[utoipa::path(
    get,
    path = "/api/{user_id}/tasks/{task_id}",
    tag = "tasks",
    params(
        ("user_id" = String, Path, description = "Owning user ID"),
        ("task_id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task found", body = TaskResponse),
        (status = 404, description = "Task not found or not owned", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token does not match user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn get_task<D: Database>(
    State(state): State<AppState<D>>,
    auth: AuthUser,
    Path((user_id, task_id)): Path<(String, String)>,
) -> Result<Json<TaskResponse>, HandlerError> {
    ensure_path_user(&auth.0, &user_id)?;

    let task = state
        .db()
        .tasks()
        .get(&task_id, &user_id)
        .await
        .map_err(|e| match e {
            DbError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Task '{}' not found", task_id),
                }),
            ),
            _ => internal_error(e),
        })?;

    Ok(Json(TaskResponse::from(task)))
}

#[utoipa::path(
    patch,
    path = "/api/{user_id}/tasks/{task_id}",
    tag = "tasks",
    params(
        ("user_id" = String, Path, description = "Owning user ID"),
        ("task_id" = String, Path, description = "Task ID")
    ),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 404, description = "Task not found or not owned", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token does not match user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth, req))]
pub async fn update_task<D: Database>(
    State(state): State<AppState<D>>,
    auth: AuthUser,
    Path((user_id, task_id)): Path<(String, String)>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, HandlerError> {
    ensure_path_user(&auth.0, &user_id)?;

    let mut task = state
        .db()
        .tasks()
        .get(&task_id, &user_id)
        .await
        .map_err(|e| match e {
            DbError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Task '{}' not found", task_id),
                }),
            ),
            _ => internal_error(e),
        })?;

    req.merge_into(&mut task);

    let updated = state
        .db()
        .tasks()
        .update(&task)
        .await
        .map_err(internal_error)?;

    Ok(Json(TaskResponse::from(updated)))
}

#[utoipa::path(
    put,
    path = "/api/{user_id}/tasks/{task_id}/status",
    tag = "tasks",
    params(
        ("user_id" = String, Path, description = "Owning user ID"),
        ("task_id" = String, Path, description = "Task ID")
    ),
    request_body = UpdateTaskStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = TaskResponse),
        (status = 400, description = "Unknown status value", body = ErrorResponse),
        (status = 404, description = "Task not found or not owned", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token does not match user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn update_task_status<D: Database>(
    State(state): State<AppState<D>>,
    auth: AuthUser,
    Path((user_id, task_id)): Path<(String, String)>,
    Json(req): Json<UpdateTaskStatusRequest>,
) -> Result<Json<TaskResponse>, HandlerError> {
    ensure_path_user(&auth.0, &user_id)?;

    let status = TaskStatus::from_str(&req.status)
        .map_err(|message| error(StatusCode::BAD_REQUEST, message))?;

    let mut task = state
        .db()
        .tasks()
        .get(&task_id, &user_id)
        .await
        .map_err(|e| match e {
            DbError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Task '{}' not found", task_id),
                }),
            ),
            _ => internal_error(e),
        })?;

    // Sets completed_at iff the task just completed, clears it otherwise.
    task.set_status(status);

    let updated = state
        .db()
        .tasks()
        .update(&task)
        .await
        .map_err(internal_error)?;

    Ok(Json(TaskResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/{user_id}/tasks/{task_id}",
    tag = "tasks",
    params(
        ("user_id" = String, Path, description = "Owning user ID"),
        ("task_id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "Task not found or not owned", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token does not match user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn delete_task<D: Database>(
    State(state): State<AppState<D>>,
    auth: AuthUser,
    Path((user_id, task_id)): Path<(String, String)>,
) -> Result<StatusCode, HandlerError> {
    ensure_path_user(&auth.0, &user_id)?;

    state
        .db()
        .tasks()
        .delete(&task_id, &user_id)
        .await
        .map_err(|e| match e {
            DbError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Task '{}' not found", task_id),
                }),
            ),
            _ => internal_error(e),
        })?;

    Ok(StatusCode::NO_CONTENT)
}
