//! GoTrue-style REST implementation of the identity provider capability

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{AuthProvider, ProviderError, ProviderUser};
use crate::config::Config;
use crate::store::Role;

/// Per-request timeout for identity calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct RestAuthProvider {
    http: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct WireUser {
    id: Uuid,
    email: String,
    email_confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    user_metadata: WireMetadata,
}

#[derive(Deserialize, Default)]
struct WireMetadata {
    full_name: Option<String>,
    role: Option<String>,
}

#[derive(Deserialize)]
struct WireTokenResponse {
    user: WireUser,
}

#[derive(Deserialize, Default)]
struct WireError {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
}

impl From<WireUser> for ProviderUser {
    fn from(user: WireUser) -> Self {
        ProviderUser {
            id: user.id,
            email: user.email,
            email_confirmed: user.email_confirmed_at.is_some(),
            full_name: user.user_metadata.full_name,
            // Unknown role strings in provider metadata fall through the
            // resolution cascade rather than erroring
            role_hint: user.user_metadata.role.as_deref().and_then(Role::parse),
        }
    }
}

impl RestAuthProvider {
    pub fn new(config: &Config) -> Self {
        let mut headers = HeaderMap::new();
        if let Ok(key) = HeaderValue::from_str(&config.supabase_anon_key) {
            headers.insert("apikey", key);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }
}

fn map_transport_err(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Transport(e.to_string())
    }
}

/// Turn a non-2xx provider response into a Rejected error carrying the
/// provider's own message.
async fn check(resp: Response) -> Result<Response, ProviderError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let wire: WireError = resp.json().await.unwrap_or_default();
    let message = wire
        .msg
        .or(wire.message)
        .or(wire.error_description)
        .unwrap_or_else(|| format!("provider returned {status}"));
    Err(ProviderError::Rejected(message))
}

#[async_trait]
impl AuthProvider for RestAuthProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        role: Role,
    ) -> Result<ProviderUser, ProviderError> {
        let resp = self
            .http
            .post(self.url("/signup"))
            .json(&json!({
                "email": email,
                "password": password,
                "data": {
                    "full_name": full_name,
                    "role": role.as_str(),
                },
            }))
            .send()
            .await
            .map_err(map_transport_err)?;

        let user: WireUser = check(resp)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Transport(format!("invalid signup response: {e}")))?;
        Ok(user.into())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, ProviderError> {
        let resp = self
            .http
            .post(self.url("/token"))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(map_transport_err)?;

        let token: WireTokenResponse = check(resp)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Transport(format!("invalid token response: {e}")))?;
        Ok(token.user.into())
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let resp = self
            .http
            .post(self.url("/logout"))
            .send()
            .await
            .map_err(map_transport_err)?;
        check(resp).await?;
        Ok(())
    }

    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), ProviderError> {
        let resp = self
            .http
            .post(self.url("/recover"))
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "email": email }))
            .send()
            .await
            .map_err(map_transport_err)?;
        check(resp).await?;
        Ok(())
    }

    async fn update_user_password(
        &self,
        recovery_token: &str,
        new_password: &str,
    ) -> Result<(), ProviderError> {
        let resp = self
            .http
            .put(self.url("/user"))
            .header(AUTHORIZATION, format!("Bearer {recovery_token}"))
            .json(&json!({ "password": new_password }))
            .send()
            .await
            .map_err(map_transport_err)?;
        check(resp).await?;
        Ok(())
    }
}
