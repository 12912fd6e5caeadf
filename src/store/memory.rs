//! In-memory storage implementations
//!
//! Used by the integration tests and for local development without a
//! hosted provider.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::{Formation, FormationStore, Profile, ProfileStore, StoreResult};

/// In-memory profile store
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<Uuid, Profile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
        }
    }

    /// Remove a profile row (for testing the no-profile login path)
    pub fn remove(&self, id: Uuid) {
        self.profiles.write().unwrap().remove(&id);
    }
}

impl Default for InMemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn insert(&self, profile: Profile) -> StoreResult<()> {
        self.profiles.write().unwrap().insert(profile.id, profile);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Profile>> {
        Ok(self.profiles.read().unwrap().get(&id).cloned())
    }
}

/// In-memory formation store
pub struct InMemoryFormationStore {
    formations: RwLock<HashMap<Uuid, Formation>>,
}

impl InMemoryFormationStore {
    pub fn new() -> Self {
        Self {
            formations: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryFormationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FormationStore for InMemoryFormationStore {
    async fn insert(&self, formation: Formation) -> StoreResult<Formation> {
        self.formations
            .write()
            .unwrap()
            .insert(formation.id, formation.clone());
        Ok(formation)
    }

    async fn list(&self) -> StoreResult<Vec<Formation>> {
        let mut all: Vec<Formation> = self.formations.read().unwrap().values().cloned().collect();
        all.sort_by_key(|f| f.scheduled_at);
        Ok(all)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Formation>> {
        Ok(self.formations.read().unwrap().get(&id).cloned())
    }

    async fn update(&self, formation: Formation) -> StoreResult<Formation> {
        self.formations
            .write()
            .unwrap()
            .insert(formation.id, formation.clone());
        Ok(formation)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.formations.write().unwrap().remove(&id);
        Ok(())
    }
}
