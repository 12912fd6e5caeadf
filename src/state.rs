//! Application state

use crate::config::Config;
use crate::provider::AuthProvider;
use crate::store::{FormationStore, ProfileStore};

/// Shared state injected into every handler. Generic over the provider and
/// store capabilities so tests can substitute in-memory fakes.
pub struct AppState<A, P, F> {
    pub config: Config,
    pub auth_provider: A,
    pub profiles: P,
    pub formations: F,
}

impl<A, P, F> AppState<A, P, F>
where
    A: AuthProvider,
    P: ProfileStore,
    F: FormationStore,
{
    pub fn new(config: Config, auth_provider: A, profiles: P, formations: F) -> Self {
        Self {
            config,
            auth_provider,
            profiles,
            formations,
        }
    }
}
