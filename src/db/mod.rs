//! Database abstraction layer.
//!
//! This module provides trait-based abstractions for data access,
//! allowing different storage backends to be swapped without changing
//! handler logic.
//!
//! # Architecture
//!
//! - `error`: Storage-agnostic error types
//! - `models`: Domain entities (User, Conversation, Message, Task)
//! - `repository`: Trait definitions for data access
//! - `sqlite`: sqlx-backed SQLite implementation

mod error;
mod models;
mod repository;
mod sqlite;
pub mod utils;

#[cfg(test)]
mod models_test;

pub use error::{DbError, DbResult};
pub use models::*;
pub use repository::*;
pub use sqlite::SqliteDatabase;
