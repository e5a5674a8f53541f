//! HTTP Auth Provider
//!
//! reqwest-backed implementation of the [`AuthProvider`] port. Every
//! request carries a bounded timeout; a timeout is a failure response,
//! not a hang. Error bodies arrive either as a plain string or as a
//! field -> message map, and are normalized into one display string.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::domain::identity::Identity;
use crate::domain::provider::{Activation, AuthGrant, AuthProvider, ProviderError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Endpoint URLs for the remote auth API
///
/// Each is optional: a missing URL degrades the matching operation to
/// a configuration-error result instead of failing startup.
#[derive(Debug, Clone, Default)]
pub struct AuthEndpoints {
    pub login: Option<String>,
    pub signup: Option<String>,
    pub activate: Option<String>,
    pub validate: Option<String>,
}

impl AuthEndpoints {
    /// Load endpoint URLs from the environment.
    ///
    /// The validate endpoint may be given directly or derived from
    /// `API_BASE_URL`.
    pub fn from_env() -> Self {
        let validate = std::env::var("API_VALIDATION_URL").ok().or_else(|| {
            std::env::var("API_BASE_URL")
                .ok()
                .map(|base| format!("{}/auth/validate", base.trim_end_matches('/')))
        });

        Self {
            login: std::env::var("API_AUTHENTICATION_URL").ok(),
            signup: std::env::var("API_SIGNUP_URL").ok(),
            activate: std::env::var("API_ACTIVATION_URL").ok(),
            validate,
        }
    }
}

/// Remote error payload: a plain string or field -> message pairs
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RemoteMessage {
    Text(String),
    Fields(BTreeMap<String, String>),
}

impl RemoteMessage {
    /// Normalize into one display string; field messages are joined
    /// with ", ". Empty payloads yield None so the caller's fallback
    /// applies.
    pub fn normalize(&self) -> Option<String> {
        match self {
            Self::Text(msg) if !msg.is_empty() => Some(msg.clone()),
            Self::Text(_) => None,
            Self::Fields(fields) if !fields.is_empty() => {
                Some(fields.values().cloned().collect::<Vec<_>>().join(", "))
            }
            Self::Fields(_) => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FailureBody {
    message: Option<RemoteMessage>,
    error: Option<RemoteMessage>,
}

impl FailureBody {
    fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_ref()
            .and_then(RemoteMessage::normalize)
            .or_else(|| self.error.as_ref().and_then(RemoteMessage::normalize))
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ApiKeyBody {
    token: String,
    expiry: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct GrantBody {
    user: Identity,
    api_key: ApiKeyBody,
}

#[derive(Debug, Deserialize)]
struct UserBody {
    user: Identity,
}

#[derive(Debug, Deserialize)]
struct ActivationBody {
    message: Option<String>,
    user: Option<Identity>,
}

/// reqwest-backed auth provider client
#[derive(Debug, Clone)]
pub struct HttpAuthProvider {
    http: reqwest::Client,
    endpoints: AuthEndpoints,
}

impl HttpAuthProvider {
    pub fn new(endpoints: AuthEndpoints) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, endpoints })
    }

    async fn rejected(resp: reqwest::Response, fallback: &str) -> ProviderError {
        let status = resp.status().as_u16();
        let body: FailureBody = resp.json().await.unwrap_or_default();
        ProviderError::Rejected {
            status,
            message: body.message_or(fallback),
        }
    }
}

fn transport(err: reqwest::Error) -> ProviderError {
    ProviderError::Transport(err.to_string())
}

impl AuthProvider for HttpAuthProvider {
    async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, ProviderError> {
        let url = self
            .endpoints
            .login
            .as_deref()
            .ok_or(ProviderError::Unconfigured("login"))?;

        let resp = self
            .http
            .post(url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            return Err(Self::rejected(resp, "Invalid email or password").await);
        }

        let body: GrantBody = resp
            .json()
            .await
            .map_err(|e| ProviderError::Transport(format!("malformed login response: {e}")))?;

        Ok(AuthGrant {
            identity: body.user,
            token: body.api_key.token,
            expiry: body.api_key.expiry,
        })
    }

    async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError> {
        let url = self
            .endpoints
            .signup
            .as_deref()
            .ok_or(ProviderError::Unconfigured("signup"))?;

        let resp = self
            .http
            .post(url)
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            return Err(Self::rejected(resp, "Signup failed. Please try again.").await);
        }

        let body: UserBody = resp
            .json()
            .await
            .map_err(|e| ProviderError::Transport(format!("malformed signup response: {e}")))?;

        Ok(body.user)
    }

    async fn activate(&self, token: &str) -> Result<Activation, ProviderError> {
        let url = self
            .endpoints
            .activate
            .as_deref()
            .ok_or(ProviderError::Unconfigured("activation"))?;

        let resp = self
            .http
            .put(url)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            return Err(
                Self::rejected(resp, "Account activation failed. Please try again.").await,
            );
        }

        let body: ActivationBody = resp
            .json()
            .await
            .map_err(|e| ProviderError::Transport(format!("malformed activation response: {e}")))?;

        Ok(Activation {
            message: body.message,
            identity: body.user,
        })
    }

    async fn validate(&self, token: &str) -> Result<Identity, ProviderError> {
        let url = self
            .endpoints
            .validate
            .as_deref()
            .ok_or(ProviderError::Unconfigured("validate"))?;

        let resp = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;

        if !resp.status().is_success() {
            return Err(Self::rejected(resp, "Token validation failed").await);
        }

        // The provider returns either { user: ... } or a bare identity;
        // anything else fails closed.
        let text = resp.text().await.map_err(transport)?;
        if let Ok(body) = serde_json::from_str::<UserBody>(&text) {
            return Ok(body.user);
        }
        serde_json::from_str::<Identity>(&text)
            .map_err(|e| ProviderError::Transport(format!("malformed validate response: {e}")))
    }
}
