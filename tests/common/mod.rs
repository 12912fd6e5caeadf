//! Common test utilities for the API integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

use formations_api::store::Role;
use formations_api::{
    routes, AppState, AuthProvider, Config, InMemoryFormationStore, InMemoryProfileStore,
    ProviderError, ProviderUser,
};

/// Recovery token the mock provider accepts for password resets
pub const VALID_RECOVERY_TOKEN: &str = "valid-recovery-token";

/// JWT secret used by every test server
pub const TEST_SECRET: &str = "test-jwt-secret";

#[derive(Clone)]
struct MockAccount {
    id: Uuid,
    password: String,
    full_name: Option<String>,
    role_hint: Option<Role>,
}

/// Mock identity provider backed by a HashMap of accounts.
#[derive(Default)]
pub struct MockAuthProvider {
    accounts: RwLock<HashMap<String, MockAccount>>,
    /// Emails that asked for a recovery link
    pub reset_requests: RwLock<Vec<String>>,
}

impl MockAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account directly, bypassing the register endpoint. Used to
    /// exercise the metadata/default tiers of the role cascade, where no
    /// profile row exists.
    pub fn add_user(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
        role_hint: Option<Role>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.accounts.write().unwrap().insert(
            email.to_string(),
            MockAccount {
                id,
                password: password.to_string(),
                full_name: full_name.map(str::to_string),
                role_hint,
            },
        );
        id
    }

    fn provider_user(&self, email: &str, account: &MockAccount) -> ProviderUser {
        ProviderUser {
            id: account.id,
            email: email.to_string(),
            email_confirmed: true,
            full_name: account.full_name.clone(),
            role_hint: account.role_hint,
        }
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        role: Role,
    ) -> Result<ProviderUser, ProviderError> {
        let mut accounts = self.accounts.write().unwrap();
        if accounts.contains_key(email) {
            return Err(ProviderError::Rejected("User already registered".to_string()));
        }
        let account = MockAccount {
            id: Uuid::new_v4(),
            password: password.to_string(),
            full_name: Some(full_name.to_string()),
            role_hint: Some(role),
        };
        accounts.insert(email.to_string(), account.clone());
        Ok(self.provider_user(email, &account))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, ProviderError> {
        let accounts = self.accounts.read().unwrap();
        match accounts.get(email) {
            Some(account) if account.password == password => {
                Ok(self.provider_user(email, account))
            }
            // Same rejection for unknown user and wrong password
            _ => Err(ProviderError::Rejected("Invalid login credentials".to_string())),
        }
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn reset_password_for_email(
        &self,
        email: &str,
        _redirect_to: &str,
    ) -> Result<(), ProviderError> {
        // The provider rejects malformed addresses but never reveals
        // whether an account exists
        if !email.contains('@') {
            return Err(ProviderError::Rejected(
                "Unable to validate email address: invalid format".to_string(),
            ));
        }
        self.reset_requests.write().unwrap().push(email.to_string());
        Ok(())
    }

    async fn update_user_password(
        &self,
        recovery_token: &str,
        _new_password: &str,
    ) -> Result<(), ProviderError> {
        if recovery_token == VALID_RECOVERY_TOKEN {
            Ok(())
        } else {
            Err(ProviderError::Rejected("Invalid or expired reset token.".to_string()))
        }
    }
}

pub type TestState = AppState<MockAuthProvider, InMemoryProfileStore, InMemoryFormationStore>;

pub fn test_config() -> Config {
    Config {
        port: 0,
        jwt_secret: TEST_SECRET.to_string(),
        supabase_url: "http://localhost:54321".to_string(),
        supabase_anon_key: "test-anon-key".to_string(),
        frontend_url: "http://localhost:3000".to_string(),
        production: false,
    }
}

/// Create a test server over the real router with in-memory stores and the
/// mock provider. The state handle allows direct seeding.
pub fn create_test_server() -> (TestServer, Arc<TestState>) {
    let state = Arc::new(AppState::new(
        test_config(),
        MockAuthProvider::new(),
        InMemoryProfileStore::new(),
        InMemoryFormationStore::new(),
    ));

    let app = routes::create_router(state.clone());
    let server = TestServer::new(app).expect("Failed to create test server");

    (server, state)
}

/// Register a user through the API.
pub async fn register(server: &TestServer, email: &str, password: &str, role: Option<&str>) {
    let mut body = json!({
        "email": email,
        "password": password,
        "full_name": "Test User",
    });
    if let Some(role) = role {
        body["role"] = json!(role);
    }

    let response = server.post("/api/auth/register").json(&body).await;
    assert_eq!(response.status_code(), 201);
}

/// Login through the API and return the session token from the body.
pub async fn login(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": email, "password": password }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    body["token"].as_str().expect("No token in login response").to_string()
}

/// Register and login, returning the session token.
pub async fn register_and_login(
    server: &TestServer,
    email: &str,
    password: &str,
    role: Option<&str>,
) -> String {
    register(server, email, password, role).await;
    login(server, email, password).await
}

/// Session cookie carrying the given token.
pub fn session_cookie(token: &str) -> cookie::Cookie<'static> {
    cookie::Cookie::new("access_token", token.to_string())
}

/// A valid create-formation body for an online session.
pub fn online_formation_body() -> Value {
    json!({
        "title": "Rust for backend engineers",
        "description": "Five half-days of hands-on Rust",
        "objectives": "Read, write and review production Rust",
        "delivery_mode": "ONLINE",
        "duration_hours": 17.5,
        "instructor": "Jane Doe",
        "scheduled_at": "2026-09-15T09:00:00Z",
        "link": "https://meet.example.com/rust"
    })
}
