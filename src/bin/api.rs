//! Taskchat API server binary.
//!
//! Creates the concrete database implementation and passes it to the API
//! server; the API layer stays agnostic of the storage backend.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use miette::Diagnostic;
use taskchat::api::{self, ApiError, Config};
use taskchat::db::{Database, DbError, SqliteDatabase};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Database error: {0}")]
    #[diagnostic(code(taskchat::binary::database))]
    Database(#[from] DbError),

    #[error("Failed to create data directory: {0}")]
    #[diagnostic(code(taskchat::binary::io))]
    Io(#[from] std::io::Error),

    #[error("API server error: {0}")]
    #[diagnostic(code(taskchat::binary::api))]
    Api(#[from] ApiError),
}

#[derive(Parser)]
#[command(name = "taskchat-api")]
#[command(author, version, about = "Todo/chat backend API server", long_about = None)]
struct Cli {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Database file path (DATABASE_URL env overrides; defaults to ./todo_chatbot.db)
    #[arg(long)]
    db: Option<PathBuf>,
}

/// Resolve the database file path: CLI flag, then DATABASE_URL (with an
/// optional `sqlite:`/`sqlite://` scheme), then the local default.
fn resolve_db_path(cli_db: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_db {
        return path;
    }

    if let Ok(url) = std::env::var("DATABASE_URL") {
        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(&url);
        return PathBuf::from(path);
    }

    PathBuf::from("todo_chatbot.db")
}

#[tokio::main]
async fn main() -> Result<(), BinaryError> {
    let cli = Cli::parse();

    let db_path = resolve_db_path(cli.db);

    println!("Opening database at {:?}", db_path);

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let db = SqliteDatabase::open(&db_path).await?;

    // Run migrations before starting the server
    db.migrate().await?;
    println!("Database migrations complete");

    // Pass the abstract Database to the API layer
    api::run(
        Config {
            host: cli.host,
            port: cli.port,
        },
        db,
    )
    .await?;

    Ok(())
}
