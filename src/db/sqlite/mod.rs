//! SQLite implementation of the database traits.

mod connection;
mod conversation;
mod helpers;
mod message;
mod task;
mod user;


pub use connection::SqliteDatabase;
pub use conversation::SqliteConversationRepository;
pub use message::SqliteMessageRepository;
pub use task::SqliteTaskRepository;
pub use user::SqliteUserRepository;
