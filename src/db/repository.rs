//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing handler logic.
//!
//! Every read or mutation of a user-owned entity takes the owning user's
//! id and folds it into the query predicate. A row that exists but belongs
//! to someone else is indistinguishable from a row that does not exist;
//! there are no post-hoc authorization checks anywhere above this layer.

use std::future::Future;

use crate::db::{
    DbResult, ListResult,
    models::{Conversation, ConversationQuery, Message, PageSort, Task, TaskQuery, User},
};

/// Repository for User operations.
pub trait UserRepository {
    /// Create a new user. Fails with `AlreadyExists` on a duplicate email.
    fn create(&self, user: &User) -> impl Future<Output = DbResult<User>> + Send;

    /// Look up a user by email.
    fn get_by_email(&self, email: &str) -> impl Future<Output = DbResult<Option<User>>> + Send;
}

/// Repository for Conversation operations.
pub trait ConversationRepository {
    /// Create a new conversation.
    fn create(&self, conversation: &Conversation)
    -> impl Future<Output = DbResult<Conversation>> + Send;

    /// Get a conversation by id, scoped to its owner.
    fn get(&self, id: &str, user_id: &str) -> impl Future<Output = DbResult<Conversation>> + Send;

    /// List a user's conversations, sortable by updated_at or created_at.
    fn list(
        &self,
        user_id: &str,
        query: Option<&ConversationQuery>,
    ) -> impl Future<Output = DbResult<ListResult<Conversation>>> + Send;

    /// Rename an owned conversation, refreshing its updated_at.
    fn update_title(
        &self,
        id: &str,
        user_id: &str,
        title: &str,
    ) -> impl Future<Output = DbResult<Conversation>> + Send;
}

/// Repository for Message operations.
pub trait MessageRepository {
    /// Append a message to a conversation owned by `user_id`, bumping the
    /// conversation's updated_at. Fails with `NotFound` when the
    /// conversation is absent or owned by someone else.
    fn create(
        &self,
        message: &Message,
        user_id: &str,
    ) -> impl Future<Output = DbResult<Message>> + Send;

    /// List a conversation's messages oldest-first. Returns an empty page
    /// (not an error) when the conversation is not owned by `user_id`.
    fn list_for_conversation(
        &self,
        conversation_id: &str,
        user_id: &str,
        page: &PageSort,
    ) -> impl Future<Output = DbResult<ListResult<Message>>> + Send;
}

/// Repository for Task operations.
pub trait TaskRepository {
    /// Create a new task.
    fn create(&self, task: &Task) -> impl Future<Output = DbResult<Task>> + Send;

    /// Get a task by id, scoped to its owner.
    fn get(&self, id: &str, user_id: &str) -> impl Future<Output = DbResult<Task>> + Send;

    /// List a user's tasks, newest first, with status bucket and priority
    /// filters.
    fn list(
        &self,
        user_id: &str,
        query: Option<&TaskQuery>,
    ) -> impl Future<Output = DbResult<ListResult<Task>>> + Send;

    /// Tasks linked to a conversation. Returns an empty list when the
    /// conversation is not owned by `user_id`.
    fn list_for_conversation(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> impl Future<Output = DbResult<Vec<Task>>> + Send;

    /// Rewrite an owned task's mutable fields, always refreshing
    /// updated_at. Returns the stored task.
    fn update(&self, task: &Task) -> impl Future<Output = DbResult<Task>> + Send;

    /// Hard-delete an owned task.
    fn delete(&self, id: &str, user_id: &str) -> impl Future<Output = DbResult<()>> + Send;
}

/// Combined database interface.
pub trait Database: Send + Sync {
    type Users<'a>: UserRepository + Send + Sync
    where
        Self: 'a;
    type Conversations<'a>: ConversationRepository + Send + Sync
    where
        Self: 'a;
    type Messages<'a>: MessageRepository + Send + Sync
    where
        Self: 'a;
    type Tasks<'a>: TaskRepository + Send + Sync
    where
        Self: 'a;

    /// Run pending migrations.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Get the user repository.
    fn users(&self) -> Self::Users<'_>;

    /// Get the conversation repository.
    fn conversations(&self) -> Self::Conversations<'_>;

    /// Get the message repository.
    fn messages(&self) -> Self::Messages<'_>;

    /// Get the task repository.
    fn tasks(&self) -> Self::Tasks<'_>;
}
