//! Tests for MCP task tools.

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;

use crate::db::{Database, SqliteDatabase, TaskRepository, TaskStatus, User, UserRepository};
use crate::mcp::McpServer;
use crate::mcp::tools::{CompleteTaskParams, CreateTaskParams, DeleteTaskParams, ListTasksParams};

async fn setup() -> (McpServer<SqliteDatabase>, Arc<SqliteDatabase>, String) {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");

    let user = db
        .users()
        .create(&User {
            id: String::new(),
            email: "alice@example.com".to_string(),
            username: None,
            password_hash: "hash".to_string(),
            is_active: true,
            created_at: String::new(),
            updated_at: String::new(),
        })
        .await
        .expect("Create user should succeed");

    let db = Arc::new(db);
    (McpServer::new(Arc::clone(&db)), db, user.id)
}

fn create_params(user_id: &str, title: &str) -> Parameters<CreateTaskParams> {
    Parameters(CreateTaskParams {
        user_id: user_id.to_string(),
        title: Some(title.to_string()),
        description: None,
        priority: None,
        conversation_id: None,
        deadline: None,
        tags: None,
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn create_task_tool_persists_with_defaults() {
    let (server, db, user_id) = setup().await;

    let result = server
        .create_task(create_params(&user_id, "Buy milk"))
        .await
        .expect("Tool call should succeed");
    assert_eq!(result.is_error, Some(false));

    let listed = db.tasks().list(&user_id, None).await.unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(listed.items[0].title, "Buy milk");
    assert_eq!(listed.items[0].status, TaskStatus::Pending);
}

#[tokio::test(flavor = "multi_thread")]
async fn create_task_tool_rejects_bad_priority() {
    let (server, _db, user_id) = setup().await;

    let result = server
        .create_task(Parameters(CreateTaskParams {
            priority: Some("urgent".to_string()),
            ..create_params(&user_id, "t").0
        }))
        .await;

    assert!(result.is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn complete_task_tool_sets_completed_at() {
    let (server, db, user_id) = setup().await;

    server
        .create_task(create_params(&user_id, "finish me"))
        .await
        .unwrap();
    let task_id = db.tasks().list(&user_id, None).await.unwrap().items[0]
        .id
        .clone();

    server
        .complete_task(Parameters(CompleteTaskParams {
            user_id: user_id.clone(),
            task_id: task_id.clone(),
        }))
        .await
        .expect("Complete should succeed");

    let stored = db.tasks().get(&task_id, &user_id).await.unwrap();
    assert_eq!(stored.status, TaskStatus::Completed);
    assert!(stored.completed_at.is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn task_tools_are_user_scoped() {
    let (server, db, alice) = setup().await;

    let bob = db
        .users()
        .create(&User {
            id: String::new(),
            email: "bob@example.com".to_string(),
            username: None,
            password_hash: "hash".to_string(),
            is_active: true,
            created_at: String::new(),
            updated_at: String::new(),
        })
        .await
        .unwrap()
        .id;

    server.create_task(create_params(&alice, "hers")).await.unwrap();
    let task_id = db.tasks().list(&alice, None).await.unwrap().items[0]
        .id
        .clone();

    // Bob's scope cannot complete or delete Alice's task.
    let result = server
        .complete_task(Parameters(CompleteTaskParams {
            user_id: bob.clone(),
            task_id: task_id.clone(),
        }))
        .await;
    assert!(result.is_err());

    let result = server
        .delete_task(Parameters(DeleteTaskParams {
            user_id: bob.clone(),
            task_id: task_id.clone(),
        }))
        .await;
    assert!(result.is_err());

    // Bob's listing is empty.
    let result = server
        .list_tasks(Parameters(ListTasksParams {
            user_id: bob,
            status: None,
            priority: None,
            limit: None,
            offset: None,
        }))
        .await
        .expect("Listing should succeed");
    assert_eq!(result.is_error, Some(false));

    let alices = db.tasks().list(&alice, None).await.unwrap();
    assert_eq!(alices.total, 1);
}
