//! Database error types.
//!
//! Abstracted error types for data access, independent of the storage
//! backend. thiserror provides the derives, miette the diagnostic codes.

use miette::Diagnostic;
use thiserror::Error;

/// Database operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Entity not found: {entity_type} with id '{id}'")]
    #[diagnostic(code(taskchat::db::not_found))]
    NotFound { entity_type: String, id: String },

    #[error("Entity already exists: {entity_type} '{key}'")]
    #[diagnostic(code(taskchat::db::already_exists))]
    AlreadyExists { entity_type: String, key: String },

    #[error("Validation error: {message}")]
    #[diagnostic(code(taskchat::db::validation_error))]
    Validation { message: String },

    #[error("Database error: {message}")]
    #[diagnostic(code(taskchat::db::database_error))]
    Database { message: String },

    #[error("Migration error: {message}")]
    #[diagnostic(code(taskchat::db::migration_error))]
    Migration { message: String },

    #[error("Connection error: {message}")]
    #[diagnostic(code(taskchat::db::connection_error))]
    Connection { message: String },
}

impl DbError {
    /// True when the error means "no such row" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
