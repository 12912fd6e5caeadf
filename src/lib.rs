//! Formations API
//!
//! REST backend for the HR training-management app: JWT-cookie
//! authentication with a two-tier role model, and CRUD over training
//! sessions ("formations"). Identity and persistence are delegated to a
//! hosted auth/database provider behind capability traits.

pub mod auth;
pub mod config;
pub mod error;
pub mod provider;
pub mod routes;
pub mod state;
pub mod store;
pub mod token;

pub use config::Config;
pub use error::ApiError;
pub use provider::{AuthProvider, ProviderError, ProviderUser, RestAuthProvider};
pub use state::AppState;
pub use store::{
    FormationStore, InMemoryFormationStore, InMemoryProfileStore, ProfileStore,
    RestFormationStore, RestProfileStore,
};
pub use token::Claims;
