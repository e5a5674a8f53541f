//! Web Frontend Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use axum::{
    Json, Router, http,
    http::{Method, header},
    routing::get,
};
use gate::{AccessPolicy, AuthEndpoints, GateConfig, HttpAuthProvider};
use platform::rate_limit::InMemoryAttemptStore;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "web=info,gate=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Remote auth API endpoints
    let endpoints = AuthEndpoints::from_env();
    if endpoints.login.is_none() {
        tracing::warn!("API_AUTHENTICATION_URL not set, login will report a configuration error");
    }

    // Gate configuration
    let mut config = if cfg!(debug_assertions) {
        GateConfig::development()
    } else {
        GateConfig::default()
    };
    // Without an introspection endpoint the gate falls back to the
    // cached identity snapshot.
    config.remote_validation = endpoints.validate.is_some();
    if !config.remote_validation {
        tracing::warn!("no validation endpoint configured, trusting cached identity cookies");
    }

    let provider = Arc::new(HttpAuthProvider::new(endpoints)?);
    let attempts = Arc::new(InMemoryAttemptStore::new());

    let state = gate::gate_state(
        provider,
        attempts,
        config,
        AccessPolicy::default(),
    );

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router: every route passes through the gate middleware
    let app = Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health))
        .merge(gate::gate_router(state.clone()))
        .layer(axum::middleware::from_fn_with_state(
            state,
            gate::middleware::route_gate::<HttpAuthProvider, InMemoryAttemptStore>,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
