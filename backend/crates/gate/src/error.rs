//! Gate Error Types
//!
//! Typed results for the auth operations. All remote-call failures are
//! caught at the orchestrator boundary and converted into one of these
//! variants; nothing raw crosses into the decision engine or the rate
//! limiter.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use std::time::Duration;
use thiserror::Error;

use crate::domain::provider::ProviderError;

/// Gate-specific result type alias
pub type GateResult<T> = Result<T, GateError>;

/// Failures surfaced by the auth operation orchestrators
#[derive(Debug, Error)]
pub enum GateError {
    /// A required endpoint URL is missing from the environment
    #[error("Service configuration error. Please contact support.")]
    Configuration(&'static str),

    /// Network failure or malformed remote response
    #[error("Unable to connect to authentication service. Please try again later.")]
    RemoteService(String),

    /// The provider rejected the operation; message already normalized
    #[error("{message}")]
    Rejected { message: String },

    /// Credentials verified but the account is not activated yet
    #[error(
        "Account not activated. Please check your email and click the activation link to complete your registration."
    )]
    NotActivated,

    /// Activation token failed local format validation
    #[error("{0}")]
    InvalidToken(&'static str),

    /// Locally computed lockout; wait time is always precise
    #[error("Too many {operation} attempts. Please try again in {} minutes.", platform::rate_limit::wait_minutes(.wait))]
    RateLimited {
        operation: &'static str,
        attempts: u32,
        wait: Duration,
    },

    /// Anything unexpected; full detail stays in the logs
    #[error("An unexpected error occurred. Please try again. (ID: {correlation_id})")]
    Internal {
        correlation_id: String,
        detail: String,
    },
}

/// Short opaque id correlating a user-visible failure with its log line
pub fn correlation_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}

impl GateError {
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            correlation_id: correlation_id(),
            detail: detail.into(),
        }
    }

    /// Map a provider failure onto the gate taxonomy
    pub fn from_provider(err: ProviderError) -> Self {
        match err {
            ProviderError::Unconfigured(endpoint) => Self::Configuration(endpoint),
            ProviderError::Transport(detail) => Self::RemoteService(detail),
            ProviderError::Rejected { message, .. } => Self::Rejected { message },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::ServiceUnavailable,
            Self::RemoteService(_) => ErrorKind::ServiceUnavailable,
            Self::Rejected { .. } => ErrorKind::Unauthorized,
            Self::NotActivated => ErrorKind::Forbidden,
            Self::InvalidToken(_) => ErrorKind::BadRequest,
            Self::RateLimited { .. } => ErrorKind::TooManyRequests,
            Self::Internal { .. } => ErrorKind::InternalServerError,
        }
    }

    /// Message safe to show the user. Detail is appended only in debug
    /// builds; production responses carry the correlation id alone.
    pub fn user_message(&self) -> String {
        match self {
            Self::Internal {
                correlation_id,
                detail,
            } if cfg!(debug_assertions) => {
                format!("An unexpected error occurred: {detail} (ID: {correlation_id})")
            }
            other => other.to_string(),
        }
    }

    /// Log with a level matching the severity
    pub fn log(&self, operation: &'static str) {
        match self {
            Self::Configuration(endpoint) => {
                tracing::error!(operation, endpoint, "auth endpoint not configured");
            }
            Self::RemoteService(detail) => {
                tracing::error!(operation, detail = %detail, "auth provider unreachable");
            }
            Self::Rejected { message } => {
                tracing::warn!(operation, message = %message, "auth operation rejected");
            }
            Self::NotActivated => {
                tracing::warn!(operation, "login attempt by unactivated account");
            }
            Self::InvalidToken(reason) => {
                tracing::warn!(operation, reason, "activation token failed validation");
            }
            Self::RateLimited {
                operation: op,
                attempts,
                wait,
            } => {
                tracing::warn!(
                    operation = op,
                    attempts,
                    wait_secs = wait.as_secs(),
                    "rate limit exceeded"
                );
            }
            Self::Internal {
                correlation_id,
                detail,
            } => {
                tracing::error!(operation, correlation_id, detail = %detail, "unexpected gate error");
            }
        }
    }

    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.user_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_message_has_wait_minutes() {
        let err = GateError::RateLimited {
            operation: "login",
            attempts: 5,
            wait: Duration::from_secs(29 * 60 + 1),
        };
        assert_eq!(
            err.to_string(),
            "Too many login attempts. Please try again in 30 minutes."
        );
        assert_eq!(err.kind(), ErrorKind::TooManyRequests);
    }

    #[test]
    fn test_provider_mapping() {
        let err = GateError::from_provider(ProviderError::Unconfigured("login"));
        assert!(matches!(err, GateError::Configuration("login")));
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);

        let err = GateError::from_provider(ProviderError::Rejected {
            status: 401,
            message: "Invalid email or password".to_string(),
        });
        assert_eq!(err.to_string(), "Invalid email or password");
    }

    #[test]
    fn test_configuration_message_is_generic() {
        let err = GateError::Configuration("signup");
        assert_eq!(
            err.to_string(),
            "Service configuration error. Please contact support."
        );
    }

    #[test]
    fn test_correlation_id_shape() {
        let id = correlation_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_internal_message_carries_id() {
        let err = GateError::Internal {
            correlation_id: "deadbeef".to_string(),
            detail: "boom".to_string(),
        };
        assert!(err.user_message().contains("deadbeef"));
    }
}
