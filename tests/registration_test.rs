//! Tests for user registration

mod common;

use common::create_test_server;
use serde_json::{json, Value};

/// Test: registration succeeds and returns a sanitized user summary
#[tokio::test]
async fn test_register_success() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "alice@example.com",
            "password": "secret1",
            "full_name": "Alice"
        }))
        .await;

    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["role"], "MEMBER");
    assert_eq!(body["user"]["full_name"], "Alice");
}

/// Test: registration does not log the user in
#[tokio::test]
async fn test_register_sets_no_cookie() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "bob@example.com",
            "password": "secret1"
        }))
        .await;

    assert_eq!(response.status_code(), 201);
    assert!(response.maybe_cookie("access_token").is_none());
}

/// Test: email and password are both required
#[tokio::test]
async fn test_register_missing_fields() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/auth/register")
        .json(&json!({ "email": "alice@example.com" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Email and password are required.");
}

/// Test: passwords shorter than 6 characters are rejected locally
#[tokio::test]
async fn test_register_short_password() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "alice@example.com",
            "password": "12345"
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["message"], "Password must be at least 6 characters long.");
}

/// Test: an unknown role string is a 400, not a silent default
#[tokio::test]
async fn test_register_invalid_role() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "alice@example.com",
            "password": "secret1",
            "role": "SUPERUSER"
        }))
        .await;

    assert_eq!(response.status_code(), 400);
}

/// Test: duplicate registration surfaces the provider's message as a 400
#[tokio::test]
async fn test_register_duplicate_email() {
    let (server, _) = create_test_server();

    common::register(&server, "alice@example.com", "secret1", None).await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "alice@example.com",
            "password": "secret1"
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["message"], "User already registered");
}

/// Test: registration with an explicit ADMIN role is reflected in the summary
#[tokio::test]
async fn test_register_admin_role() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "rh@example.com",
            "password": "secret1",
            "role": "ADMIN"
        }))
        .await;

    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    assert_eq!(body["user"]["role"], "ADMIN");
}
