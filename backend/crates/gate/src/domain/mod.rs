//! Domain Layer
//!
//! Core types and the auth-provider port.

pub mod artifact;
pub mod identity;
pub mod provider;
pub mod route;
pub mod session;

pub use artifact::AuthArtifact;
pub use identity::{Identity, Role};
pub use provider::{Activation, AuthGrant, AuthProvider, ProviderError};
pub use route::{AccessPolicy, RouteClass, RouteDecision};
pub use session::SessionState;
