//! User Identity
//!
//! Authoritative user snapshot owned by the remote auth provider.
//! Cached client-side only for the lifetime of a valid token and never
//! mutated locally; a fresh snapshot arrives with every login or
//! re-validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User role as reported by the auth provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// User snapshot returned by the auth provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned id; older provider versions omit it
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub activated: bool,
    #[serde(default)]
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
