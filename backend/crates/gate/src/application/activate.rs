//! Activation Use Case
//!
//! Redeems an emailed activation token. The token format is validated
//! locally first so obviously bogus tokens never reach the limiter or
//! the network. Activation keys its attempt counter by the token value
//! since there is no email to key on.

use std::sync::Arc;

use platform::rate_limit::{AttemptKey, AttemptStore};

use crate::application::config::GateConfig;
use crate::domain::identity::Identity;
use crate::domain::provider::{AuthProvider, ProviderError};
use crate::error::{GateError, GateResult};

const OPERATION: &str = "activation";

/// Tokens shorter than this are rejected without a remote call
const MIN_TOKEN_LEN: usize = 10;

/// Activation request after transport decoding
#[derive(Debug, Clone)]
pub struct ActivateInput {
    pub token: String,
    pub client_addr: String,
}

/// Successful activation outcome
#[derive(Debug, Clone, PartialEq)]
pub struct ActivateOutput {
    pub message: String,
    pub identity: Option<Identity>,
}

/// Activation orchestrator
pub struct ActivateUseCase<P, S>
where
    P: AuthProvider + Sync,
    S: AttemptStore + Sync,
{
    provider: Arc<P>,
    attempts: Arc<S>,
    config: Arc<GateConfig>,
}

impl<P, S> ActivateUseCase<P, S>
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

    /// Run the activation flow.
    pub async fn execute(&self, input: ActivateInput) -> GateResult<ActivateOutput> {
        let token = input.token.trim();
        validate_token(token)?;

        let key = AttemptKey::new(OPERATION, token.to_string(), input.client_addr.clone());
        let status = self
            .attempts
            .check(&key, &self.config.activation_limit)
            .await;
        if !status.allowed {
            return Err(GateError::RateLimited {
                operation: OPERATION,
                attempts: status.attempts,
                wait: status.wait,
            });
        }

        match self.provider.activate(token).await {
            Ok(activation) => {
                self.attempts.clear(&key).await;
                tracing::info!("account activation succeeded");
                Ok(ActivateOutput {
                    message: activation.message.unwrap_or_else(|| {
                        "Your account has been activated successfully. You can now log in."
                            .to_string()
                    }),
                    identity: activation.identity,
                })
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

fn validate_token(token: &str) -> GateResult<()> {
    if token.is_empty() {
        return Err(GateError::InvalidToken(
            "Activation token is missing. Please use the link from your email.",
        ));
    }
    if token.len() < MIN_TOKEN_LEN || !token.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(GateError::InvalidToken(
            "Invalid activation token format. Please use the link from your email.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::Role;
    use crate::domain::provider::{Activation, AuthGrant};
    use platform::rate_limit::InMemoryAttemptStore;

    struct FakeProvider {
        activate_result: Result<Activation, ProviderError>,
    }

    impl AuthProvider for FakeProvider {
        async fn login(&self, _: &str, _: &str) -> Result<AuthGrant, ProviderError> {
            unimplemented!("not used in these tests")
        }

        async fn signup(&self, _: &str, _: &str, _: &str) -> Result<Identity, ProviderError> {
            unimplemented!("not used in these tests")
        }

        async fn activate(&self, _: &str) -> Result<Activation, ProviderError> {
            self.activate_result.clone()
        }

        async fn validate(&self, _: &str) -> Result<Identity, ProviderError> {
            unimplemented!("not used in these tests")
        }
    }

    fn identity() -> Identity {
        Identity {
            id: "u-3".to_string(),
            name: "Kai".to_string(),
            email: "kai@example.com".to_string(),
            created_at: "2025-01-01T00:00:00Z".parse().unwrap(),
            activated: true,
            role: Role::User,
        }
    }

    fn use_case(
        activate_result: Result<Activation, ProviderError>,
    ) -> ActivateUseCase<FakeProvider, InMemoryAttemptStore> {
        ActivateUseCase::new(
            Arc::new(FakeProvider { activate_result }),
            Arc::new(InMemoryAttemptStore::new()),
            Arc::new(GateConfig::development()),
        )
    }

    fn input(token: &str) -> ActivateInput {
        ActivateInput {
            token: token.to_string(),
            client_addr: "203.0.113.7".to_string(),
        }
    }

    #[tokio::test]
    async fn test_success_with_provider_message() {
        let use_case = use_case(Ok(Activation {
            message: Some("Account activated".to_string()),
            identity: Some(identity()),
        }));

        let output = use_case.execute(input("AbC123xyz789")).await.unwrap();
        assert_eq!(output.message, "Account activated");
        assert!(output.identity.is_some());
    }

    #[tokio::test]
    async fn test_success_without_message_uses_default() {
        let use_case = use_case(Ok(Activation {
            message: None,
            identity: None,
        }));

        let output = use_case.execute(input("AbC123xyz789")).await.unwrap();
        assert!(output.message.contains("activated successfully"));
    }

    #[tokio::test]
    async fn test_empty_token_rejected_locally() {
        let use_case = use_case(Ok(Activation {
            message: None,
            identity: None,
        }));

        let err = use_case.execute(input("   ")).await.unwrap_err();
        assert!(matches!(err, GateError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_short_or_nonalphanumeric_token_rejected_locally() {
        let use_case = use_case(Ok(Activation {
            message: None,
            identity: None,
        }));

        let err = use_case.execute(input("short")).await.unwrap_err();
        assert!(matches!(err, GateError::InvalidToken(_)));

        let err = use_case.execute(input("AbC123xyz!@#")).await.unwrap_err();
        assert!(matches!(err, GateError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_lockout_after_five_failures() {
        let use_case = use_case(Err(ProviderError::Rejected {
            status: 422,
            message: "invalid or expired activation token".to_string(),
        }));

        for _ in 0..5 {
            let err = use_case.execute(input("AbC123xyz789")).await.unwrap_err();
            assert!(matches!(err, GateError::Rejected { .. }));
        }

        let err = use_case.execute(input("AbC123xyz789")).await.unwrap_err();
        match err {
            GateError::RateLimited {
                operation, attempts, ..
            } => {
                assert_eq!(operation, "activation");
                assert_eq!(attempts, 5);
            }
            other => panic!("expected rate limit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_format_does_not_consume_attempts() {
        let use_case = use_case(Ok(Activation {
            message: None,
            identity: None,
        }));

        for _ in 0..20 {
            let err = use_case.execute(input("short")).await.unwrap_err();
            assert!(matches!(err, GateError::InvalidToken(_)));
        }

        // A well-formed token still goes through
        assert!(use_case.execute(input("AbC123xyz789")).await.is_ok());
    }
}
