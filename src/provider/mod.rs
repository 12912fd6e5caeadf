//! External identity provider capability
//!
//! The provider owns password hashing, credential verification and
//! recovery-link issuance. This system only calls it; tests substitute a
//! mock.

pub mod rest;

pub use rest::RestAuthProvider;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::store::Role;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider refused the request; its own message is safe to surface
    /// on 400-class auth flows.
    #[error("{0}")]
    Rejected(String),

    #[error("provider request timed out")]
    Timeout,

    #[error("provider transport error: {0}")]
    Transport(String),
}

/// Identity as reported by the provider. Read-only on our side.
#[derive(Debug, Clone)]
pub struct ProviderUser {
    pub id: Uuid,
    pub email: String,
    pub email_confirmed: bool,
    /// Display name from the identity's metadata, if any
    pub full_name: Option<String>,
    /// Role hint from the identity's metadata; second tier of the role
    /// resolution cascade
    pub role_hint: Option<Role>,
}

/// Capability surface of the hosted identity provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an account; the role and display name are stored as identity
    /// metadata on the provider side.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        role: Role,
    ) -> Result<ProviderUser, ProviderError>;

    /// Verify credentials. Any rejection reason collapses to a uniform
    /// invalid-credentials outcome at the API layer.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, ProviderError>;

    /// Invalidate the provider's own session, if one exists.
    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Ask the provider to email a recovery link. Must not reveal whether
    /// the address has an account.
    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), ProviderError>;

    /// Set a new password using the provider's recovery-session token.
    async fn update_user_password(
        &self,
        recovery_token: &str,
        new_password: &str,
    ) -> Result<(), ProviderError>;
}
