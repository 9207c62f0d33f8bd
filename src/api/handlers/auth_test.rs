//! Integration tests for auth endpoints.

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

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn register(app: &axum::Router, email: &str) -> Value {
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/register",
            &json!({"email": email, "password": "hunter2hunter2", "username": "alice"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

#[tokio::test(flavor = "multi_thread")]
async fn register_returns_identity_and_token() {
    let app = test_app().await;

    let body = register(&app, "alice@example.com").await;
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["username"], "alice");
    assert_eq!(body["token_type"], "bearer");
    assert!(!body["user_id"].as_str().unwrap().is_empty());
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn register_duplicate_email_is_rejected() {
    let app = test_app().await;
    register(&app, "alice@example.com").await;

    let response = app
        .oneshot(post_json(
            "/auth/register",
            &json!({"email": "alice@example.com", "password": "other-password", "username": "imposter"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test(flavor = "multi_thread")]
async fn register_oversized_password_is_rejected() {
    let app = test_app().await;

    let response = app
        .oneshot(post_json(
            "/auth/register",
            &json!({"email": "alice@example.com", "password": "x".repeat(73), "username": "alice"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn login_roundtrip() {
    let app = test_app().await;
    let registered = register(&app, "alice@example.com").await;

    let response = app
        .oneshot(post_json(
            "/auth/login",
            &json!({"email": "alice@example.com", "password": "hunter2hunter2"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["user_id"], registered["user_id"]);
    assert_eq!(body["token_type"], "bearer");
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn login_bad_credentials_are_unauthorized() {
    let app = test_app().await;
    register(&app, "alice@example.com").await;

    // Wrong password.
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            &json!({"email": "alice@example.com", "password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Unknown email gets the same answer.
    let response = app
        .oneshot(post_json(
            "/auth/login",
            &json!({"email": "nobody@example.com", "password": "hunter2hunter2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread")]
async fn login_oversized_password_is_unauthorized() {
    let app = test_app().await;
    register(&app, "alice@example.com").await;

    let response = app
        .oneshot(post_json(
            "/auth/login",
            &json!({"email": "alice@example.com", "password": "x".repeat(73)}),
        ))
        .await
        .unwrap();

    // 401 at login, unlike the 400 at registration.
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread")]
async fn verify_accepts_with_and_without_bearer_prefix() {
    let app = test_app().await;
    let registered = register(&app, "alice@example.com").await;
    let token = registered["access_token"].as_str().unwrap();

    for header in [format!("Bearer {}", token), token.to_string()] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/verify")
                    .header("authorization", header)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["user_id"], registered["user_id"]);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn verify_rejects_bad_or_missing_token() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/verify")
                .header("authorization", "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/verify")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
