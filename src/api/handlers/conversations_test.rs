//! Integration tests for conversation and message endpoints.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api::{AppState, create_router};
use crate::auth::TokenManager;
use crate::db::{Database, SqliteDatabase};

async fn test_app() -> axum::Router {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create test database");
    db.migrate().await.expect("Failed to run migrations");

    let state = AppState::new(db, TokenManager::new("test-secret", 30));
    create_router(state)
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn register(app: &axum::Router, email: &str) -> (String, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_vec(
                        &json!({"email": email, "password": "hunter2hunter2", "username": "u"}),
                    )
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    (
        body["user_id"].as_str().unwrap().to_string(),
        body["access_token"].as_str().unwrap().to_string(),
    )
}

fn authed(method: &str, uri: &str, token: &str, body: Option<&Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));
    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn create_conversation(app: &axum::Router, user_id: &str, token: &str, body: &Value) -> Value {
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/{}/conversations", user_id),
            token,
            Some(body),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

#[tokio::test(flavor = "multi_thread")]
async fn create_conversation_defaults_title() {
    let app = test_app().await;
    let (user_id, token) = register(&app, "alice@example.com").await;

    let created = create_conversation(&app, &user_id, &token, &json!({})).await;
    assert!(
        created["title"].as_str().unwrap().starts_with("Conversation "),
        "Missing title should default to a timestamp-derived one"
    );
    assert_eq!(created["status"], "active");

    let named = create_conversation(&app, &user_id, &token, &json!({"title": "Groceries"})).await;
    assert_eq!(named["title"], "Groceries");
}

#[tokio::test(flavor = "multi_thread")]
async fn get_conversation_roundtrip() {
    let app = test_app().await;
    let (user_id, token) = register(&app, "alice@example.com").await;

    let created = create_conversation(&app, &user_id, &token, &json!({"title": "Chat"})).await;
    let conversation_id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(authed(
            "GET",
            &format!("/api/{}/conversations/{}", user_id, conversation_id),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["id"], created["id"]);

    let response = app
        .oneshot(authed(
            "GET",
            &format!("/api/{}/conversations/nonexistent", user_id),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_conversations_sorting() {
    let app = test_app().await;
    let (user_id, token) = register(&app, "alice@example.com").await;

    let first = create_conversation(&app, &user_id, &token, &json!({"title": "first"})).await;
    let second = create_conversation(&app, &user_id, &token, &json!({"title": "second"})).await;

    // Default order: most recently updated first.
    let response = app
        .clone()
        .oneshot(authed(
            "GET",
            &format!("/api/{}/conversations", user_id),
            &token,
            None,
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"][0]["id"], second["id"]);
    assert_eq!(body["items"][1]["id"], first["id"]);

    // Oldest-created first when asked.
    let response = app
        .oneshot(authed(
            "GET",
            &format!(
                "/api/{}/conversations?sort_by=created_at&order=asc",
                user_id
            ),
            &token,
            None,
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["items"][0]["id"], first["id"]);
    assert_eq!(body["items"][1]["id"], second["id"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn rename_conversation() {
    let app = test_app().await;
    let (user_id, token) = register(&app, "alice@example.com").await;

    let created = create_conversation(&app, &user_id, &token, &json!({"title": "Old"})).await;
    let conversation_id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(authed(
            "PUT",
            &format!("/api/{}/conversations/{}", user_id, conversation_id),
            &token,
            Some(&json!({"title": "New"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["title"], "New");

    let response = app
        .oneshot(authed(
            "PUT",
            &format!("/api/{}/conversations/nonexistent", user_id),
            &token,
            Some(&json!({"title": "New"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn messages_append_and_list() {
    let app = test_app().await;
    let (user_id, token) = register(&app, "alice@example.com").await;

    let conversation = create_conversation(&app, &user_id, &token, &json!({"title": "Chat"})).await;
    let conversation_id = conversation["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/{}/conversations/{}/messages", user_id, conversation_id),
            &token,
            Some(&json!({"content": "add milk to my list"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let first = json_body(response).await;
    assert_eq!(first["sender_type"], "user");

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/{}/conversations/{}/messages", user_id, conversation_id),
            &token,
            Some(&json!({
                "content": "Added \"Buy milk\" to your tasks.",
                "sender_type": "assistant",
                "metadata": "{\"task_id\":\"t-1\"}"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(authed(
            "GET",
            &format!("/api/{}/conversations/{}/messages", user_id, conversation_id),
            &token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total"], 2);
    // Oldest first.
    assert_eq!(body["items"][0]["content"], "add milk to my list");
    assert_eq!(body["items"][1]["sender_type"], "assistant");
    assert_eq!(body["items"][1]["metadata"], "{\"task_id\":\"t-1\"}");
}

#[tokio::test(flavor = "multi_thread")]
async fn messages_of_unowned_conversation_read_as_empty() {
    let app = test_app().await;
    let (alice_id, alice_token) = register(&app, "alice@example.com").await;
    let (bob_id, bob_token) = register(&app, "bob@example.com").await;

    let conversation =
        create_conversation(&app, &alice_id, &alice_token, &json!({"title": "Private"})).await;
    let conversation_id = conversation["id"].as_str().unwrap();

    app.clone()
        .oneshot(authed(
            "POST",
            &format!("/api/{}/conversations/{}/messages", alice_id, conversation_id),
            &alice_token,
            Some(&json!({"content": "secret"})),
        ))
        .await
        .unwrap();

    // Bob reading Alice's conversation: 200 with an empty page, not 404.
    let response = app
        .clone()
        .oneshot(authed(
            "GET",
            &format!("/api/{}/conversations/{}/messages", bob_id, conversation_id),
            &bob_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["items"].as_array().unwrap().is_empty());
    assert_eq!(body["total"], 0);

    // Writing is a hard failure though.
    let response = app
        .oneshot(authed(
            "POST",
            &format!("/api/{}/conversations/{}/messages", bob_id, conversation_id),
            &bob_token,
            Some(&json!({"content": "intrusion"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn message_content_is_bounded() {
    let app = test_app().await;
    let (user_id, token) = register(&app, "alice@example.com").await;

    let conversation = create_conversation(&app, &user_id, &token, &json!({"title": "Chat"})).await;
    let conversation_id = conversation["id"].as_str().unwrap();

    let response = app
        .oneshot(authed(
            "POST",
            &format!("/api/{}/conversations/{}/messages", user_id, conversation_id),
            &token,
            Some(&json!({"content": "x".repeat(10_001)})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn conversation_tasks_are_ownership_gated() {
    let app = test_app().await;
    let (alice_id, alice_token) = register(&app, "alice@example.com").await;
    let (bob_id, bob_token) = register(&app, "bob@example.com").await;

    let conversation =
        create_conversation(&app, &alice_id, &alice_token, &json!({"title": "Planning"})).await;
    let conversation_id = conversation["id"].as_str().unwrap();

    app.clone()
        .oneshot(authed(
            "POST",
            &format!("/api/{}/tasks", alice_id),
            &alice_token,
            Some(&json!({"title": "From chat", "conversation_id": conversation_id})),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(authed(
            "GET",
            &format!("/api/{}/conversations/{}/tasks", alice_id, conversation_id),
            &alice_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "From chat");

    let response = app
        .oneshot(authed(
            "GET",
            &format!("/api/{}/conversations/{}/tasks", bob_id, conversation_id),
            &bob_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn liveness_probes() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Todo chatbot API is running");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}
