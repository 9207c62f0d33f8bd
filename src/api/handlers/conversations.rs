//! Conversation and message handlers.

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
use crate::db::utils::default_conversation_title;
use crate::db::{
    Conversation, ConversationQuery, ConversationRepository, ConversationStatus, Database, DbError,
    Message, MessageRepository, PageSort, SenderType, SortOrder, TaskRepository,
};

use super::tasks::TaskResponse;
use super::{ErrorResponse, HandlerError, ensure_path_user, error, internal_error};

/// Longest accepted message body.
const MAX_MESSAGE_CONTENT: usize = 10_000;

// =============================================================================
// DTOs
// =============================================================================

#[derive(Serialize, ToSchema)]
pub struct ConversationResponse {
    pub id: String,
    pub user_id: String,
    #[schema(example = "Groceries")]
    pub title: String,
    #[schema(example = "active")]
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Conversation> for ConversationResponse {
    fn from(c: Conversation) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            title: c.title,
            status: c.status.to_string(),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub id: String,
    pub conversation_id: String,
    #[schema(example = "user")]
    pub sender_type: String,
    pub content: String,
    pub metadata: Option<String>,
    pub timestamp: String,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            conversation_id: m.conversation_id,
            sender_type: m.sender_type.to_string(),
            content: m.content,
            metadata: m.metadata,
            timestamp: m.timestamp,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateConversationRequest {
    /// Defaults to a timestamp-derived title when absent or empty.
    #[schema(example = "Groceries")]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateConversationRequest {
    #[schema(example = "Renamed chat")]
    pub title: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMessageRequest {
    pub content: String,
    /// "user" (default) or "assistant".
    #[schema(example = "user")]
    pub sender_type: Option<String>,
    /// Opaque JSON string stored verbatim.
    pub metadata: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListConversationsQuery {
    /// Maximum number of items to return
    #[param(example = 20)]
    pub limit: Option<usize>,
    /// Number of items to skip
    #[param(example = 0)]
    pub offset: Option<usize>,
    /// Field to sort by (updated_at, created_at)
    #[param(example = "updated_at")]
    pub sort_by: Option<String>,
    /// Sort order (asc, desc)
    #[param(example = "desc")]
    pub order: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListMessagesQuery {
    /// Maximum number of items to return
    #[param(example = 50)]
    pub limit: Option<usize>,
    /// Number of items to skip
    #[param(example = 0)]
    pub offset: Option<usize>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedConversations {
    pub items: Vec<ConversationResponse>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedMessages {
    pub items: Vec<MessageResponse>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    post,
    path = "/api/{user_id}/conversations",
    tag = "conversations",
    params(("user_id" = String, Path, description = "Owning user ID")),
    request_body = CreateConversationRequest,
    responses(
        (status = 201, description = "Conversation created", body = ConversationResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token does not match user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth, req))]
pub async fn create_conversation<D: Database>(
    State(state): State<AppState<D>>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Json(req): Json<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ConversationResponse>), HandlerError> {
    ensure_path_user(&auth.0, &user_id)?;

    let title = match req.title {
        Some(title) if !title.is_empty() => title,
        _ => default_conversation_title(),
    };

    let conversation = Conversation {
        id: String::new(), // Repository will generate this
        user_id,
        title,
        status: ConversationStatus::Active,
        created_at: String::new(),
        updated_at: String::new(),
    };

    let created = state
        .db()
        .conversations()
        .create(&conversation)
        .await
        .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(ConversationResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/api/{user_id}/conversations",
    tag = "conversations",
    params(
        ("user_id" = String, Path, description = "Owning user ID"),
        ListConversationsQuery
    ),
    responses(
        (status = 200, description = "Paginated list of conversations", body = PaginatedConversations),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token does not match user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn list_conversations<D: Database>(
    State(state): State<AppState<D>>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Query(query): Query<ListConversationsQuery>,
) -> Result<Json<PaginatedConversations>, HandlerError> {
    ensure_path_user(&auth.0, &user_id)?;

    let db_query = ConversationQuery {
        page: PageSort {
            limit: Some(query.limit.unwrap_or(20)),
            offset: query.offset,
            sort_by: query.sort_by,
            sort_order: match query.order.as_deref() {
                Some("asc") => Some(SortOrder::Asc),
                Some("desc") => Some(SortOrder::Desc),
                _ => None,
            },
        },
    };

    let result = state
        .db()
        .conversations()
        .list(&user_id, Some(&db_query))
        .await
        .map_err(internal_error)?;

    let items: Vec<ConversationResponse> = result
        .items
        .into_iter()
        .map(ConversationResponse::from)
        .collect();

    Ok(Json(PaginatedConversations {
        items,
        total: result.total,
        limit: result.limit.unwrap_or(20),
        offset: result.offset,
    }))
}

#[utoipa::path(
    get,
    path = "/api/{user_id}/conversations/{conversation_id}",
    tag = "conversations",
    params(
        ("user_id" = String, Path, description = "Owning user ID"),
        ("conversation_id" = String, Path, description = "Conversation ID")
    ),
    responses(
        (status = 200, description = "Conversation found", body = ConversationResponse),
        (status = 404, description = "Conversation not found or not owned", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token does not match user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn get_conversation<D: Database>(
    State(state): State<AppState<D>>,
    auth: AuthUser,
    Path((user_id, conversation_id)): Path<(String, String)>,
) -> Result<Json<ConversationResponse>, HandlerError> {
    ensure_path_user(&auth.0, &user_id)?;

    let conversation = state
        .db()
        .conversations()
        .get(&conversation_id, &user_id)
        .await
        .map_err(|e| match e {
            DbError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Conversation '{}' not found", conversation_id),
                }),
            ),
            _ => internal_error(e),
        })?;

    Ok(Json(ConversationResponse::from(conversation)))
}

#[utoipa::path(
    put,
    path = "/api/{user_id}/conversations/{conversation_id}",
    tag = "conversations",
    params(
        ("user_id" = String, Path, description = "Owning user ID"),
        ("conversation_id" = String, Path, description = "Conversation ID")
    ),
    request_body = UpdateConversationRequest,
    responses(
        (status = 200, description = "Conversation renamed", body = ConversationResponse),
        (status = 404, description = "Conversation not found or not owned", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token does not match user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth, req))]
pub async fn update_conversation_title<D: Database>(
    State(state): State<AppState<D>>,
    auth: AuthUser,
    Path((user_id, conversation_id)): Path<(String, String)>,
    Json(req): Json<UpdateConversationRequest>,
) -> Result<Json<ConversationResponse>, HandlerError> {
    ensure_path_user(&auth.0, &user_id)?;

    let updated = state
        .db()
        .conversations()
        .update_title(&conversation_id, &user_id, &req.title)
        .await
        .map_err(|e| match e {
            DbError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Conversation '{}' not found", conversation_id),
                }),
            ),
            _ => internal_error(e),
        })?;

    Ok(Json(ConversationResponse::from(updated)))
}

#[utoipa::path(
    get,
    path = "/api/{user_id}/conversations/{conversation_id}/messages",
    tag = "conversations",
    params(
        ("user_id" = String, Path, description = "Owning user ID"),
        ("conversation_id" = String, Path, description = "Conversation ID"),
        ListMessagesQuery
    ),
    responses(
        (status = 200, description = "Messages oldest-first; empty when the conversation is not owned", body = PaginatedMessages),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token does not match user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn list_conversation_messages<D: Database>(
    State(state): State<AppState<D>>,
    auth: AuthUser,
    Path((user_id, conversation_id)): Path<(String, String)>,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<PaginatedMessages>, HandlerError> {
    ensure_path_user(&auth.0, &user_id)?;

    let page = PageSort {
        limit: Some(query.limit.unwrap_or(50)),
        offset: query.offset,
        ..Default::default()
    };

    let result = state
        .db()
        .messages()
        .list_for_conversation(&conversation_id, &user_id, &page)
        .await
        .map_err(internal_error)?;

    let items: Vec<MessageResponse> = result.items.into_iter().map(MessageResponse::from).collect();

    Ok(Json(PaginatedMessages {
        items,
        total: result.total,
        limit: result.limit.unwrap_or(50),
        offset: result.offset,
    }))
}

#[utoipa::path(
    post,
    path = "/api/{user_id}/conversations/{conversation_id}/messages",
    tag = "conversations",
    params(
        ("user_id" = String, Path, description = "Owning user ID"),
        ("conversation_id" = String, Path, description = "Conversation ID")
    ),
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message appended", body = MessageResponse),
        (status = 400, description = "Oversized content", body = ErrorResponse),
        (status = 404, description = "Conversation not found or not owned", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token does not match user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth, req))]
pub async fn create_conversation_message<D: Database>(
    State(state): State<AppState<D>>,
    auth: AuthUser,
    Path((user_id, conversation_id)): Path<(String, String)>,
    Json(req): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), HandlerError> {
    ensure_path_user(&auth.0, &user_id)?;

    if req.content.chars().count() > MAX_MESSAGE_CONTENT {
        return Err(error(
            StatusCode::BAD_REQUEST,
            format!("Message content cannot exceed {} characters", MAX_MESSAGE_CONTENT),
        ));
    }

    let sender_type = req
        .sender_type
        .as_deref()
        .and_then(|s| SenderType::from_str(s).ok())
        .unwrap_or_default();

    let message = Message {
        id: String::new(), // Repository will generate this
        conversation_id: conversation_id.clone(),
        sender_type,
        content: req.content,
        metadata: req.metadata,
        timestamp: String::new(),
    };

    let created = state
        .db()
        .messages()
        .create(&message, &user_id)
        .await
        .map_err(|e| match e {
            DbError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Conversation '{}' not found", conversation_id),
                }),
            ),
            _ => internal_error(e),
        })?;

    Ok((StatusCode::CREATED, Json(MessageResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/api/{user_id}/conversations/{conversation_id}/tasks",
    tag = "conversations",
    params(
        ("user_id" = String, Path, description = "Owning user ID"),
        ("conversation_id" = String, Path, description = "Conversation ID")
    ),
    responses(
        (status = 200, description = "Tasks linked to the conversation; empty when not owned", body = [TaskResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Token does not match user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth))]
pub async fn list_conversation_tasks<D: Database>(
    State(state): State<AppState<D>>,
    auth: AuthUser,
    Path((user_id, conversation_id)): Path<(String, String)>,
) -> Result<Json<Vec<TaskResponse>>, HandlerError> {
    ensure_path_user(&auth.0, &user_id)?;

    let tasks = state
        .db()
        .tasks()
        .list_for_conversation(&conversation_id, &user_id)
        .await
        .map_err(internal_error)?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}
