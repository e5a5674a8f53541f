//! Gate Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use platform::rate_limit::AttemptStore;

use crate::application::config::GateConfig;
use crate::domain::provider::AuthProvider;
use crate::domain::route::AccessPolicy;
use crate::presentation::handlers::{self, GateAppState};

/// Build the shared gate state
pub fn gate_state<P, S>(
    provider: Arc<P>,
    attempts: Arc<S>,
    config: GateConfig,
    policy: AccessPolicy,
) -> GateAppState<P, S>
where
    P: AuthProvider + Send + Sync + 'static,
    S: AttemptStore + Send + Sync + 'static,
{
    GateAppState {
        provider,
        attempts,
        config: Arc::new(config),
        policy: Arc::new(policy),
    }
}

/// Create the gate router for any provider and attempt store
pub fn gate_router<P, S>(state: GateAppState<P, S>) -> Router
where
    P: AuthProvider + Send + Sync + 'static,
    S: AttemptStore + Send + Sync + 'static,
{
    Router::new()
        .route("/login", post(handlers::login::<P, S>))
        .route("/signup", post(handlers::signup::<P, S>))
        .route("/activation", get(handlers::activation::<P, S>))
        .route("/logout", post(handlers::logout::<P, S>))
        .route("/api/auth/session", get(handlers::session_status))
        .with_state(state)
}
