//! Signup Use Case
//!
//! Registers a new account against the remote provider. Signup never
//! issues a token; the account stays unusable until activation. The
//! attempt budget here is the tightest of the three operations since
//! signup sends email.

use std::sync::Arc;

use platform::rate_limit::{AttemptKey, AttemptStore};

use crate::application::config::GateConfig;
use crate::domain::identity::Identity;
use crate::domain::provider::{AuthProvider, ProviderError};
use crate::error::{GateError, GateResult};

const OPERATION: &str = "signup";

/// Signup request after transport decoding
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub client_addr: String,
}

/// Signup orchestrator
pub struct SignupUseCase<P, S>
where
    P: AuthProvider + Sync,
    S: AttemptStore + Sync,
{
    provider: Arc<P>,
    attempts: Arc<S>,
    config: Arc<GateConfig>,
}

impl<P, S> SignupUseCase<P, S>
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

    /// Run the signup flow, returning the (not yet activated) identity.
    pub async fn execute(&self, input: SignupInput) -> GateResult<Identity> {
        let name = input.name.trim().to_string();
        let email = input.email.trim().to_lowercase();
        if name.is_empty() || email.is_empty() || input.password.is_empty() {
            return Err(GateError::Rejected {
                message: "Name, email and password are required.".to_string(),
            });
        }

        let key = AttemptKey::new(OPERATION, email.clone(), input.client_addr.clone());
        let status = self.attempts.check(&key, &self.config.signup_limit).await;
        if !status.allowed {
            return Err(GateError::RateLimited {
                operation: OPERATION,
                attempts: status.attempts,
                wait: status.wait,
            });
        }

        match self.provider.signup(&name, &email, &input.password).await {
            Ok(identity) => {
                self.attempts.clear(&key).await;
                tracing::info!(email = %email, "signup succeeded");
                Ok(identity)
            }
            Err(err) => {
                if !matches!(err, ProviderError::Unconfigured(_)) {
                    self.attempts.record_failure(&key).await;
                }
                Err(GateError::from_provider(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::Role;
    use crate::domain::provider::{Activation, AuthGrant};
    use platform::rate_limit::InMemoryAttemptStore;

    struct FakeProvider {
        signup_result: Result<Identity, ProviderError>,
    }

    impl AuthProvider for FakeProvider {
        async fn login(&self, _: &str, _: &str) -> Result<AuthGrant, ProviderError> {
            unimplemented!("not used in these tests")
        }

        async fn signup(&self, _: &str, _: &str, _: &str) -> Result<Identity, ProviderError> {
            self.signup_result.clone()
        }

        async fn activate(&self, _: &str) -> Result<Activation, ProviderError> {
            unimplemented!("not used in these tests")
        }

        async fn validate(&self, _: &str) -> Result<Identity, ProviderError> {
            unimplemented!("not used in these tests")
        }
    }

    fn identity() -> Identity {
        Identity {
            id: "u-2".to_string(),
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            created_at: "2025-01-01T00:00:00Z".parse().unwrap(),
            activated: false,
            role: Role::User,
        }
    }

    fn use_case(
        signup_result: Result<Identity, ProviderError>,
    ) -> SignupUseCase<FakeProvider, InMemoryAttemptStore> {
        SignupUseCase::new(
            Arc::new(FakeProvider { signup_result }),
            Arc::new(InMemoryAttemptStore::new()),
            Arc::new(GateConfig::development()),
        )
    }

    fn input() -> SignupInput {
        SignupInput {
            name: " Sam ".to_string(),
            email: "Sam@Example.com".to_string(),
            password: "hunter22".to_string(),
            client_addr: "203.0.113.7".to_string(),
        }
    }

    #[tokio::test]
    async fn test_success_returns_unactivated_identity() {
        let use_case = use_case(Ok(identity()));
        let result = use_case.execute(input()).await.unwrap();
        assert!(!result.activated);
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let use_case = use_case(Ok(identity()));
        let mut input = input();
        input.name = "   ".to_string();

        let err = use_case.execute(input).await.unwrap_err();
        assert!(matches!(err, GateError::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_lockout_after_three_failures() {
        let use_case = use_case(Err(ProviderError::Rejected {
            status: 422,
            message: "a user with this email address already exists".to_string(),
        }));

        for _ in 0..3 {
            let err = use_case.execute(input()).await.unwrap_err();
            assert!(matches!(err, GateError::Rejected { .. }));
        }

        let err = use_case.execute(input()).await.unwrap_err();
        match err {
            GateError::RateLimited {
                operation, attempts, ..
            } => {
                assert_eq!(operation, "signup");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected rate limit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_counts_as_attempt() {
        let use_case = use_case(Err(ProviderError::Transport("connection refused".to_string())));

        for _ in 0..3 {
            let err = use_case.execute(input()).await.unwrap_err();
            assert!(matches!(err, GateError::RemoteService(_)));
        }

        let err = use_case.execute(input()).await.unwrap_err();
        assert!(matches!(err, GateError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_misconfiguration_does_not_consume_attempts() {
        let use_case = use_case(Err(ProviderError::Unconfigured("signup")));

        for _ in 0..10 {
            let err = use_case.execute(input()).await.unwrap_err();
            assert!(matches!(err, GateError::Configuration(_)));
        }
    }
}
