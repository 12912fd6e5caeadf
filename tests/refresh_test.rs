//! Tests for token refresh

mod common;

use common::{create_test_server, register_and_login, session_cookie, TEST_SECRET};
use formations_api::store::Role;
use formations_api::token;
use serde_json::Value;
use uuid::Uuid;

/// Test: refresh without a cookie is a 401
#[tokio::test]
async fn test_refresh_without_cookie() {
    let (server, _) = create_test_server();

    let response = server.post("/api/auth/refresh").await;

    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["message"], "No token to refresh.");
}

/// Test: a structurally invalid cookie is a 401
#[tokio::test]
async fn test_refresh_with_garbage_cookie() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/auth/refresh")
        .add_cookie(session_cookie("garbage"))
        .await;

    assert_eq!(response.status_code(), 401);
}

/// Test: refresh re-mints a fresh token and resets the cookie
#[tokio::test]
async fn test_refresh_returns_new_token() {
    let (server, _) = create_test_server();
    let token = register_and_login(&server, "alice@example.com", "secret1", None).await;

    let response = server
        .post("/api/auth/refresh")
        .add_cookie(session_cookie(&token))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    let new_token = body["token"].as_str().unwrap();

    let cookie = response.maybe_cookie("access_token").expect("No refreshed cookie");
    assert_eq!(cookie.value(), new_token);

    // The new token verifies and carries the same identity
    let old = token::verify(&token, TEST_SECRET).unwrap();
    let new = token::verify(new_token, TEST_SECRET).unwrap();
    assert_eq!(old.sub, new.sub);
    assert_eq!(old.email, new.email);
    assert_eq!(old.role, new.role);
}

/// Test: refresh accepts an expired token and preserves its claims.
/// This is the deliberately-preserved sliding-session behavior: refresh
/// trusts previously-issued claims without re-authenticating.
#[tokio::test]
async fn test_refresh_accepts_expired_token() {
    let (server, _) = create_test_server();

    let user_id = Uuid::new_v4();
    let past = chrono::Utc::now() - chrono::Duration::seconds(token::TOKEN_TTL_SECS + 3600);
    let expired =
        token::mint_at(user_id, "alice@example.com", Role::Admin, TEST_SECRET, past).unwrap();
    assert!(token::verify(&expired, TEST_SECRET).is_err());

    let response = server
        .post("/api/auth/refresh")
        .add_cookie(session_cookie(&expired))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let claims = token::verify(body["token"].as_str().unwrap(), TEST_SECRET).unwrap();
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.role, Role::Admin);
}
