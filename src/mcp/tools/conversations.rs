//! Parameter structs for the conversation tools.

use rmcp::{schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListConversationsParams {
    #[schemars(description = "ID of the user whose conversations to list")]
    pub user_id: String,
    #[schemars(description = "Sort field: 'updated_at' (default) or 'created_at'")]
    pub sort_by: Option<String>,
    #[schemars(description = "Maximum number of conversations to return (default: 10, max: 20)")]
    pub limit: Option<usize>,
    #[schemars(description = "Number of conversations to skip")]
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateConversationParams {
    #[schemars(description = "ID of the user the conversation belongs to")]
    pub user_id: String,
    #[schemars(description = "Title. Defaults to a timestamp-derived one when omitted.")]
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetConversationMessagesParams {
    #[schemars(description = "ID of the user who owns the conversation")]
    pub user_id: String,
    #[schemars(description = "Conversation ID")]
    pub conversation_id: String,
    #[schemars(description = "Maximum number of messages to return (default: 10, max: 20)")]
    pub limit: Option<usize>,
    #[schemars(description = "Number of messages to skip")]
    pub offset: Option<usize>,
}
