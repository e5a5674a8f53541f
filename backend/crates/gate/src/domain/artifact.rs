//! Auth Artifact
//!
//! The bundle of persisted authentication data: bearer token, its
//! expiry, and the cached identity snapshot. Exactly one artifact is
//! active per client session; it is the sole source of truth for
//! "is this caller authenticated".

use chrono::{DateTime, Utc};

use crate::domain::identity::Identity;

/// Persisted authentication artifact
#[derive(Debug, Clone, PartialEq)]
pub struct AuthArtifact {
    /// Opaque bearer token
    pub token: String,
    /// Token expiry as reported by the provider
    pub expiry: DateTime<Utc>,
    /// Cached identity snapshot; absent when only the token survived
    pub identity: Option<Identity>,
}

impl AuthArtifact {
    pub fn new(token: impl Into<String>, expiry: DateTime<Utc>, identity: Option<Identity>) -> Self {
        Self {
            token: token.into(),
            expiry,
            identity,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiry
    }

    /// Remaining token lifetime in whole seconds; negative when expired
    pub fn lifetime_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.expiry - now).num_seconds()
    }
}
