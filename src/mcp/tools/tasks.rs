//! Parameter structs for the task tools.

use rmcp::{schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListTasksParams {
    #[schemars(description = "ID of the user whose tasks to list")]
    pub user_id: String,
    #[schemars(
        description = "Status bucket: 'all' (default), 'pending' (anything not completed), 'completed'"
    )]
    pub status: Option<String>,
    #[schemars(description = "Exact-match priority filter: 'low', 'medium', 'high'")]
    pub priority: Option<String>,
    #[schemars(description = "Maximum number of tasks to return (default: 10, max: 20)")]
    pub limit: Option<usize>,
    #[schemars(description = "Number of tasks to skip")]
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetTaskParams {
    #[schemars(description = "ID of the user who owns the task")]
    pub user_id: String,
    #[schemars(description = "Task ID")]
    pub task_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateTaskParams {
    #[schemars(description = "ID of the user the task belongs to")]
    pub user_id: String,
    #[schemars(description = "Task title (what needs to be done)")]
    pub title: Option<String>,
    #[schemars(description = "Longer description. Optional.")]
    pub description: Option<String>,
    #[schemars(description = "Priority: 'low', 'medium' (default), 'high'")]
    pub priority: Option<String>,
    #[schemars(description = "Conversation this task came out of. Optional.")]
    pub conversation_id: Option<String>,
    #[schemars(description = "Due date as YYYY-MM-DD. Optional.")]
    pub deadline: Option<String>,
    #[schemars(description = "Tags for categorization. Optional.")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateTaskParams {
    #[schemars(description = "ID of the user who owns the task")]
    pub user_id: String,
    #[schemars(description = "Task ID to update")]
    pub task_id: String,
    #[schemars(description = "New title (optional)")]
    pub title: Option<String>,
    #[schemars(description = "New description (optional)")]
    pub description: Option<String>,
    #[schemars(
        description = "New status: 'pending', 'in_progress', 'completed' (sets completed_at). Optional."
    )]
    pub status: Option<String>,
    #[schemars(description = "New priority: 'low', 'medium', 'high' (optional)")]
    pub priority: Option<String>,
    #[schemars(description = "Due date as YYYY-MM-DD (optional)")]
    pub deadline: Option<String>,
    #[schemars(description = "Tags (optional). Replaces all existing tags when provided.")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CompleteTaskParams {
    #[schemars(description = "ID of the user who owns the task")]
    pub user_id: String,
    #[schemars(description = "Task ID to mark as completed")]
    pub task_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DeleteTaskParams {
    #[schemars(description = "ID of the user who owns the task")]
    pub user_id: String,
    #[schemars(description = "Task ID to delete")]
    pub task_id: String,
}
