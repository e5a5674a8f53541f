//! Session Validation Use Case
//!
//! Derives the request's authentication state from the stored
//! artifact. This never fails: every error path resolves to Anonymous
//! with a diagnostic log, and invalid artifacts are cleared from the
//! store so the next request starts clean.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::GateConfig;
use crate::domain::provider::AuthProvider;
use crate::domain::session::SessionState;
use crate::infra::cookie_store::CookieTokenStore;

/// Session validator
pub struct SessionValidator<P>
where
    P: AuthProvider + Sync,
{
    provider: Arc<P>,
    config: Arc<GateConfig>,
}

impl<P> SessionValidator<P>
where
    P: AuthProvider + Sync,
{
    pub fn new(provider: Arc<P>, config: Arc<GateConfig>) -> Self {
        Self { provider, config }
    }

    /// Validate the stored artifact and return the session state.
    pub async fn validate(&self, store: &mut CookieTokenStore) -> SessionState {
        let Some(artifact) = store.read() else {
            return SessionState::Anonymous;
        };

        if artifact.is_expired_at(Utc::now()) {
            tracing::info!("bearer token expired, clearing auth cookies");
            store.clear();
            return SessionState::Anonymous;
        }

        if self.config.remote_validation {
            // Fail closed: any provider error or ambiguous body means
            // the token is treated as invalid.
            match self.provider.validate(&artifact.token).await {
                Ok(identity) => SessionState::authenticated(identity),
                Err(err) => {
                    tracing::warn!(error = %err, "token validation failed, clearing auth cookies");
                    store.clear();
                    SessionState::Anonymous
                }
            }
        } else {
            // Legacy posture: trust the cached identity snapshot.
            match artifact.identity {
                Some(identity) => SessionState::authenticated(identity),
                None => {
                    tracing::warn!("bearer token present but no identity snapshot, clearing");
                    store.clear();
                    SessionState::Anonymous
                }
            }
        }
    }
}
