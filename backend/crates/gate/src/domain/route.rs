//! Route Classification
//!
//! Maps request paths to policy buckets and defines the per-request
//! access decision value.

use axum::http::StatusCode;

/// Policy bucket assigned to a path prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Freely accessible
    Public,
    /// Auth forms; authenticated users are bounced away
    AuthOnly,
    /// Requires an authenticated session
    Protected,
    /// Requires an authenticated admin session
    Admin,
}

/// Per-request access decision
///
/// Never persisted; consumed by the request pipeline and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Continue,
    RedirectTo {
        location: String,
        status: StatusCode,
    },
    Reject {
        status: StatusCode,
        message: &'static str,
    },
}

impl RouteDecision {
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::RedirectTo {
            location: location.into(),
            status: StatusCode::SEE_OTHER,
        }
    }

    pub fn reject(status: StatusCode, message: &'static str) -> Self {
        Self::Reject { status, message }
    }
}

/// Process-wide static route policy
///
/// Immutable after startup. Classification is longest-prefix match, so
/// a Public rule nested under a Protected prefix (health endpoints
/// under `/api`) wins for its subtree.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<(String, RouteClass)>,
    /// Paths an unverified user may still reach
    verification_exempt: Vec<String>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            rules: vec![
                ("/dashboard".to_string(), RouteClass::Protected),
                ("/profile".to_string(), RouteClass::Protected),
                ("/settings".to_string(), RouteClass::Protected),
                ("/api".to_string(), RouteClass::Protected),
                ("/api/health".to_string(), RouteClass::Public),
                ("/api/auth/session".to_string(), RouteClass::Public),
                ("/health".to_string(), RouteClass::Public),
                ("/login".to_string(), RouteClass::AuthOnly),
                ("/signup".to_string(), RouteClass::AuthOnly),
                ("/activation".to_string(), RouteClass::AuthOnly),
                ("/admin".to_string(), RouteClass::Admin),
            ],
            verification_exempt: vec![
                "/verify-email".to_string(),
                "/logout".to_string(),
                "/api/auth/session".to_string(),
            ],
        }
    }
}

impl AccessPolicy {
    pub fn new(rules: Vec<(String, RouteClass)>, verification_exempt: Vec<String>) -> Self {
        Self {
            rules,
            verification_exempt,
        }
    }

    /// Classify a path by longest matching prefix; unmatched paths are
    /// Public.
    pub fn classify(&self, path: &str) -> RouteClass {
        self.rules
            .iter()
            .filter(|(prefix, _)| path.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, class)| *class)
            .unwrap_or(RouteClass::Public)
    }

    /// Whether an unverified user may reach this path without being
    /// sent to the verify-email page.
    pub fn is_verification_exempt(&self, path: &str) -> bool {
        self.verification_exempt
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}
