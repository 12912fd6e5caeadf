//! PostgREST-backed storage implementations
//!
//! Thin clients over the hosted provider's row store. Every request runs
//! under a bounded timeout; timeouts surface as 503 and other transport
//! failures as 500.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use uuid::Uuid;

use super::{Formation, FormationStore, Profile, ProfileStore, StoreResult};
use crate::config::Config;
use crate::error::ApiError;

/// Per-request timeout for row-store calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

fn build_client(config: &Config) -> Client {
    let mut headers = HeaderMap::new();
    if let Ok(key) = HeaderValue::from_str(&config.supabase_anon_key) {
        headers.insert("apikey", key);
    }
    if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", config.supabase_anon_key)) {
        headers.insert(AUTHORIZATION, bearer);
    }
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .default_headers(headers)
        .build()
        .unwrap_or_default()
}

fn map_transport_err(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Unavailable
    } else {
        ApiError::Internal(format!("row store request failed: {e}"))
    }
}

async fn check(resp: Response) -> StoreResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::GATEWAY_TIMEOUT {
        return Err(ApiError::Unavailable);
    }
    let detail = resp.text().await.unwrap_or_default();
    Err(ApiError::Internal(format!("row store returned {status}: {detail}")))
}

/// Profile rows in the provider's `profiles` table
pub struct RestProfileStore {
    http: Client,
    base_url: String,
}

impl RestProfileStore {
    pub fn new(config: &Config) -> Self {
        Self {
            http: build_client(config),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/profiles", self.base_url)
    }
}

#[async_trait]
impl ProfileStore for RestProfileStore {
    async fn insert(&self, profile: Profile) -> StoreResult<()> {
        let resp = self
            .http
            .post(self.table_url())
            .header("Prefer", "return=minimal")
            .json(&profile)
            .send()
            .await
            .map_err(map_transport_err)?;
        check(resp).await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Profile>> {
        let resp = self
            .http
            .get(self.table_url())
            .query(&[("id", format!("eq.{id}")), ("select", "*".to_string())])
            .send()
            .await
            .map_err(map_transport_err)?;
        let rows: Vec<Profile> = check(resp)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Internal(format!("invalid profile row: {e}")))?;
        Ok(rows.into_iter().next())
    }
}

/// Formation rows in the provider's `formations` table
pub struct RestFormationStore {
    http: Client,
    base_url: String,
}

impl RestFormationStore {
    pub fn new(config: &Config) -> Self {
        Self {
            http: build_client(config),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/formations", self.base_url)
    }

    async fn read_single(resp: Response) -> StoreResult<Formation> {
        let rows: Vec<Formation> = check(resp)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Internal(format!("invalid formation row: {e}")))?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ApiError::Internal("row store returned no row".to_string()))
    }
}

#[async_trait]
impl FormationStore for RestFormationStore {
    async fn insert(&self, formation: Formation) -> StoreResult<Formation> {
        let resp = self
            .http
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(&formation)
            .send()
            .await
            .map_err(map_transport_err)?;
        Self::read_single(resp).await
    }

    async fn list(&self) -> StoreResult<Vec<Formation>> {
        let resp = self
            .http
            .get(self.table_url())
            .query(&[("select", "*"), ("order", "scheduled_at.asc")])
            .send()
            .await
            .map_err(map_transport_err)?;
        check(resp)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Internal(format!("invalid formation rows: {e}")))
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Formation>> {
        let resp = self
            .http
            .get(self.table_url())
            .query(&[("id", format!("eq.{id}")), ("select", "*".to_string())])
            .send()
            .await
            .map_err(map_transport_err)?;
        let rows: Vec<Formation> = check(resp)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Internal(format!("invalid formation row: {e}")))?;
        Ok(rows.into_iter().next())
    }

    async fn update(&self, formation: Formation) -> StoreResult<Formation> {
        let resp = self
            .http
            .patch(self.table_url())
            .query(&[("id", format!("eq.{}", formation.id))])
            .header("Prefer", "return=representation")
            .json(&formation)
            .send()
            .await
            .map_err(map_transport_err)?;
        Self::read_single(resp).await
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let resp = self
            .http
            .delete(self.table_url())
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(map_transport_err)?;
        check(resp).await?;
        Ok(())
    }
}
