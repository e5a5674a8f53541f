//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::identity::Identity;

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

// ============================================================================
// Signup
// ============================================================================

/// Signup request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

// ============================================================================
// Activation
// ============================================================================

/// Activation query string (GET /activation?token=...)
#[derive(Debug, Clone, Deserialize)]
pub struct ActivationQuery {
    pub token: Option<String>,
}

// ============================================================================
// Operation Outcome
// ============================================================================

/// Uniform outcome envelope for the auth form operations.
///
/// Expected failures (bad credentials, lockout, unactivated account)
/// are reported in-band with `success: false` so the form can render
/// the message; only unexpected errors escape as HTTP failures.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Identity>,
}

impl OperationResponse {
    pub fn ok(message: impl Into<String>, user: Option<Identity>) -> Self {
        Self {
            success: true,
            message: message.into(),
            user,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            user: None,
        }
    }
}

// ============================================================================
// Session Status
// ============================================================================

/// Session status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub is_admin: bool,
    pub is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Identity>,
}
