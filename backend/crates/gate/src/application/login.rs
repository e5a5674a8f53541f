//! Login Use Case
//!
//! Rate-limit precheck, remote credential verification, activation
//! gate, then token persistence. Failed attempts count against the
//! (operation, email, client address) key; a success resets it.

use std::sync::Arc;

use platform::rate_limit::{AttemptKey, AttemptStore};

use crate::application::config::GateConfig;
use crate::domain::artifact::AuthArtifact;
use crate::domain::identity::Identity;
use crate::domain::provider::{AuthProvider, ProviderError};
use crate::error::{GateError, GateResult};
use crate::infra::cookie_store::CookieTokenStore;

const OPERATION: &str = "login";

/// Login request after transport decoding
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
    pub client_addr: String,
}

impl LoginInput {
    /// Trim and lowercase the email; passwords pass through untouched.
    fn sanitized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// Login orchestrator
pub struct LoginUseCase<P, S>
where
    P: AuthProvider + Sync,
    S: AttemptStore + Sync,
{
    provider: Arc<P>,
    attempts: Arc<S>,
    config: Arc<GateConfig>,
}

impl<P, S> LoginUseCase<P, S>
where
    P: AuthProvider + Sync,
    S: AttemptStore + Sync,
{
    pub fn new(provider: Arc<P>, attempts: Arc<S>, config: Arc<GateConfig>) -> Self {
        Self {
            provider,
            attempts,
            config,
        }
    }

    /// Run the login flow. On success the bearer artifact is written to
    /// `store` and the authenticated identity is returned.
    pub async fn execute(
        &self,
        input: LoginInput,
        store: &mut CookieTokenStore,
    ) -> GateResult<Identity> {
        let email = input.sanitized_email();
        if email.is_empty() || input.password.is_empty() {
            return Err(GateError::Rejected {
                message: "Email and password are required.".to_string(),
            });
        }

        let key = AttemptKey::new(OPERATION, email.clone(), input.client_addr.clone());
        let status = self.attempts.check(&key, &self.config.login_limit).await;
        if !status.allowed {
            return Err(GateError::RateLimited {
                operation: OPERATION,
                attempts: status.attempts,
                wait: status.wait,
            });
        }

        let grant = match self.provider.login(&email, &input.password).await {
            Ok(grant) => grant,
            Err(err) => {
                // Misconfiguration is not the caller's fault and must
                // not eat into their attempt budget.
                if !matches!(err, ProviderError::Unconfigured(_)) {
                    self.attempts.record_failure(&key).await;
                }
                return Err(GateError::from_provider(err));
            }
        };

        // Credentials checked out; the counter resets even when the
        // account still needs activation.
        self.attempts.clear(&key).await;

        if !grant.identity.activated {
            return Err(GateError::NotActivated);
        }

        let artifact = AuthArtifact::new(grant.token, grant.expiry, Some(grant.identity.clone()));
        store.write(&artifact, input.remember_me);

        tracing::info!(email = %email, "login succeeded");
        Ok(grant.identity)
    }
}
