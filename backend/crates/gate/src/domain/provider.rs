//! Auth Provider Port
//!
//! Trait the orchestrators and the session validator call out through.
//! The HTTP implementation lives in `infra::http_provider`; tests use
//! in-memory fakes.

use chrono::{DateTime, Utc};

use crate::domain::identity::Identity;

/// Successful login grant: identity plus the bearer token to persist
#[derive(Debug, Clone, PartialEq)]
pub struct AuthGrant {
    pub identity: Identity,
    pub token: String,
    pub expiry: DateTime<Utc>,
}

/// Successful activation outcome
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    pub message: Option<String>,
    pub identity: Option<Identity>,
}

/// Failure talking to or reported by the auth provider
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// The endpoint URL for this operation is not configured
    #[error("{0} endpoint is not configured")]
    Unconfigured(&'static str),

    /// Network failure, timeout, or a malformed success body
    #[error("auth provider request failed: {0}")]
    Transport(String),

    /// The provider answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

/// Remote authentication API operations
#[trait_variant::make(AuthProvider: Send)]
pub trait LocalAuthProvider {
    /// POST credentials, returning a bearer grant
    async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, ProviderError>;

    /// POST a new registration
    async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError>;

    /// PUT an activation token
    async fn activate(&self, token: &str) -> Result<Activation, ProviderError>;

    /// Introspect a bearer token, returning the current identity
    async fn validate(&self, token: &str) -> Result<Identity, ProviderError>;
}
