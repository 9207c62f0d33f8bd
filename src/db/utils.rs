//! Database utility functions.

use sqlx::types::chrono::Utc;
use uuid::Uuid;

/// Generate a UUIDv4 string ID for database entities.
pub fn generate_entity_id() -> String {
    Uuid::new_v4().to_string()
}

/// Get current UTC datetime as string in SQLite format.
pub fn current_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Default title for a conversation created without one.
pub fn default_conversation_title() -> String {
    format!("Conversation {}", Utc::now().format("%Y-%m-%d %H:%M"))
}
