//! Tests for login

mod common;

use common::{create_test_server, register};
use serde_json::{json, Value};

/// Test: login with an unknown account fails with the uniform message
#[tokio::test]
async fn test_login_unknown_user() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "nobody@example.com",
            "password": "whatever1"
        }))
        .await;

    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid email or password.");
}

/// Test: wrong password yields the exact same status and message as an
/// unknown account (enumeration resistance)
#[tokio::test]
async fn test_login_wrong_password_indistinguishable() {
    let (server, _) = create_test_server();
    register(&server, "alice@example.com", "secret1", None).await;

    let wrong_password = server
        .post("/api/auth/login")
        .json(&json!({ "email": "alice@example.com", "password": "wrong12" }))
        .await;
    let unknown_user = server
        .post("/api/auth/login")
        .json(&json!({ "email": "ghost@example.com", "password": "wrong12" }))
        .await;

    assert_eq!(wrong_password.status_code(), 401);
    assert_eq!(unknown_user.status_code(), 401);

    let a: Value = wrong_password.json();
    let b: Value = unknown_user.json();
    assert_eq!(a, b);
}

/// Test: successful login sets the session cookie and returns the token
#[tokio::test]
async fn test_login_success() {
    let (server, _) = create_test_server();
    register(&server, "alice@example.com", "secret1", None).await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "alice@example.com", "password": "secret1" }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["role"], "MEMBER");
    assert_eq!(body["user"]["email"], "alice@example.com");

    let cookie = response.maybe_cookie("access_token").expect("No session cookie");
    assert_eq!(cookie.value(), body["token"].as_str().unwrap());
    assert_eq!(cookie.http_only(), Some(true));
}

/// Test: missing body fields are a 400, not a 401
#[tokio::test]
async fn test_login_missing_fields() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "alice@example.com" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["message"], "Email and password are required.");
}
