//! Data models for profiles and formations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Two-tier role model. `Admin` may mutate formations; `Member` may only
/// read. Defaults to the lowest privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Member => "MEMBER",
        }
    }

    /// Case-insensitive parse of the wire form.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("ADMIN") {
            Some(Role::Admin)
        } else if s.eq_ignore_ascii_case("MEMBER") {
            Some(Role::Member)
        } else {
            None
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Member
    }
}

/// How a formation is delivered. On-site and hybrid formations need a
/// location; online and hybrid formations need a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryMode {
    OnSite,
    Online,
    Hybrid,
}

impl DeliveryMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ON_SITE" => Some(DeliveryMode::OnSite),
            "ONLINE" => Some(DeliveryMode::Online),
            "HYBRID" => Some(DeliveryMode::Hybrid),
            _ => None,
        }
    }

    pub fn requires_location(&self) -> bool {
        matches!(self, DeliveryMode::OnSite | DeliveryMode::Hybrid)
    }

    pub fn requires_link(&self) -> bool {
        matches!(self, DeliveryMode::Online | DeliveryMode::Hybrid)
    }
}

/// Locally owned user metadata row, keyed by the provider's identity id.
/// Created best-effort right after provider-side registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A training session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Pedagogical objectives
    pub objectives: String,
    pub delivery_mode: DeliveryMode,
    /// Duration in hours, strictly positive
    pub duration_hours: f64,
    pub instructor: String,
    pub scheduled_at: DateTime<Utc>,
    /// Required for on-site and hybrid formations
    pub location: Option<String>,
    /// Required for online and hybrid formations
    pub link: Option<String>,
    /// Identity id of the admin who created the record
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
