//! Domain models for the taskchat database.
//!
//! These models are storage-agnostic and represent the core entities
//! used throughout the application: users, their conversations with the
//! assistant, the messages inside those conversations, and their tasks.

use serde::{Deserialize, Serialize};

use super::utils::current_timestamp;

// =============================================================================
// Query Types for Pagination and Sorting
// =============================================================================

/// Sort order for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Base pagination and sorting options - composed into entity-specific queries.
#[derive(Debug, Clone, Default)]
pub struct PageSort {
    /// Maximum number of items to return.
    pub limit: Option<usize>,
    /// Number of items to skip.
    pub offset: Option<usize>,
    /// Field to sort by (validated per entity type).
    pub sort_by: Option<String>,
    /// Sort order (ascending or descending).
    pub sort_order: Option<SortOrder>,
}

/// Query for Conversations - pagination + sorting by updated_at/created_at.
#[derive(Debug, Clone, Default)]
pub struct ConversationQuery {
    pub page: PageSort,
}

/// Query for Tasks - pagination + status bucket and priority filters.
///
/// Ordering is fixed: newest first by creation time. The status bucket is
/// "all" (no filter), "pending" (anything not completed), or "completed";
/// any other value behaves like "all".
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub page: PageSort,
    /// Status bucket: "all" | "pending" | "completed".
    pub status: Option<String>,
    /// Exact-match priority filter ("low" | "medium" | "high").
    pub priority: Option<String>,
}

/// Result of a paginated list query.
#[derive(Debug, Clone)]
pub struct ListResult<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Total count of all matching items (before pagination).
    pub total: usize,
    /// Limit that was applied.
    pub limit: Option<usize>,
    /// Offset that was applied.
    pub offset: usize,
}

impl<T> ListResult<T> {
    /// An empty page, used for silently unauthorized collection reads.
    pub fn empty(page: &PageSort) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            limit: page.limit,
            offset: page.offset.unwrap_or(0),
        }
    }
}

/// UUIDv4 string ID type used for all entities.
pub type Id = String;

// =============================================================================
// Entities
// =============================================================================

/// A registered account. Owns conversations and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub email: String,
    pub username: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A chat thread between a user and the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Id,
    pub user_id: Id,
    pub title: String,
    pub status: ConversationStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Status of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    #[default]
    Active,
    Archived,
}

impl std::fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationStatus::Active => write!(f, "active"),
            ConversationStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for ConversationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ConversationStatus::Active),
            "archived" => Ok(ConversationStatus::Archived),
            _ => Err(format!("Invalid conversation status: {}", s)),
        }
    }
}

/// A single chat message within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Id,
    pub conversation_id: Id,
    pub sender_type: SenderType,
    pub content: String,
    /// Opaque JSON payload attached by the chat flow, stored verbatim.
    pub metadata: Option<String>,
    pub timestamp: String,
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    #[default]
    User,
    Assistant,
}

impl std::fmt::Display for SenderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SenderType::User => write!(f, "user"),
            SenderType::Assistant => write!(f, "assistant"),
        }
    }
}

impl std::str::FromStr for SenderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(SenderType::User),
            "assistant" => Ok(SenderType::Assistant),
            _ => Err(format!("Invalid sender type: {}", s)),
        }
    }
}

/// A to-do item owned by a user, optionally linked to a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Id,
    pub user_id: Id,
    pub conversation_id: Option<Id>,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Due date as `YYYY-MM-DD`.
    pub deadline: Option<String>,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub completed_at: Option<String>,
}

impl Task {
    /// Change the status, maintaining the invariant that `completed_at`
    /// is set iff the task is completed.
    pub fn set_status(&mut self, status: TaskStatus) {
        self.completed_at = match status {
            TaskStatus::Completed => Some(current_timestamp()),
            _ => None,
        };
        self.status = status;
    }
}

/// Status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(format!("Invalid task status: {}", s)),
        }
    }
}

/// Priority of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "low"),
            TaskPriority::Medium => write!(f, "medium"),
            TaskPriority::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(format!("Invalid task priority: {}", s)),
        }
    }
}
