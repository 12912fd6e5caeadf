//! Service configuration
//!
//! All configuration is read from the process environment exactly once at
//! startup and carried as an immutable struct injected into [`AppState`].
//!
//! [`AppState`]: crate::state::AppState

use std::fmt;

use anyhow::{Context, Result};

#[derive(Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// HMAC secret for session tokens
    pub jwt_secret: String,

    /// Base URL of the hosted auth/database provider
    pub supabase_url: String,

    /// Provider API key sent with every request
    pub supabase_anon_key: String,

    /// Origin of the frontend SPA; used for CORS and password-reset redirects
    pub frontend_url: String,

    /// Whether we are running in production (turns on the Secure cookie flag)
    pub production: bool,
}

impl Config {
    /// Load configuration from the environment. Fails fast with the name of
    /// the first missing required variable.
    pub fn from_env() -> Result<Self> {
        let jwt_secret = require("JWT_SECRET")?;
        let supabase_url = require("SUPABASE_URL")?;
        let supabase_anon_key = require("SUPABASE_ANON_KEY")?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT is not a valid port number")?,
            Err(_) => 5000,
        };

        let frontend_url = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let production = std::env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        Ok(Self {
            port,
            jwt_secret,
            supabase_url,
            supabase_anon_key,
            frontend_url,
            production,
        })
    }
}

fn require(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{key} is not set in the environment"))
}

// Manual Debug so secrets never end up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("supabase_url", &self.supabase_url)
            .field("supabase_anon_key", &"<redacted>")
            .field("frontend_url", &self.frontend_url)
            .field("production", &self.production)
            .finish()
    }
}
