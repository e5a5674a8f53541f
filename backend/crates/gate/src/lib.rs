//! Gate (Authentication Gate) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Session state, route policy, provider port
//! - `application/` - Use cases: session validation, route decisions,
//!   login/signup/activation orchestration
//! - `infra/` - Cookie token store, HTTP auth provider
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Cookie-backed bearer token persistence with remember-me
//! - Per-request session validation against the remote auth API
//! - Longest-prefix route classification and access decisions
//! - Rate-limited login/signup/activation orchestration
//!
//! ## Security Model
//! - Tokens live in HttpOnly cookies; nothing auth-bearing reaches JS
//! - Remote token introspection fails closed
//! - Lockout windows keyed by operation, identifier, and client address
//! - Redirect targets restricted to same-site absolute paths

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::GateConfig;
pub use domain::route::AccessPolicy;
pub use domain::session::SessionState;
pub use error::{GateError, GateResult};
pub use infra::http_provider::{AuthEndpoints, HttpAuthProvider};
pub use presentation::router::{gate_router, gate_state};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::artifact::*;
    pub use crate::domain::identity::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
