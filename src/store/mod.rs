//! Storage abstractions over the provider's row store

pub mod memory;
pub mod models;
pub mod rest;

pub use memory::{InMemoryFormationStore, InMemoryProfileStore};
pub use models::*;
pub use rest::{RestFormationStore, RestProfileStore};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ApiError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, ApiError>;

/// Storage for user profile rows, keyed by provider identity id.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert a new profile row
    async fn insert(&self, profile: Profile) -> StoreResult<()>;

    /// Get a profile by identity id
    async fn get(&self, id: Uuid) -> StoreResult<Option<Profile>>;
}

/// Storage for formation rows.
#[async_trait]
pub trait FormationStore: Send + Sync {
    /// Insert a new formation, returning the persisted record
    async fn insert(&self, formation: Formation) -> StoreResult<Formation>;

    /// All formations, ordered by scheduled date ascending
    async fn list(&self) -> StoreResult<Vec<Formation>>;

    /// Get a formation by id
    async fn get(&self, id: Uuid) -> StoreResult<Option<Formation>>;

    /// Replace an existing formation with the given merged record
    async fn update(&self, formation: Formation) -> StoreResult<Formation>;

    /// Remove a formation by id
    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}
