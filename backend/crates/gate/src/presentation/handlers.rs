//! HTTP Handlers

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use platform::client::client_addr_string;
use platform::rate_limit::AttemptStore;

use crate::application::config::GateConfig;
use crate::application::{
    ActivateInput, ActivateUseCase, LoginInput, LoginUseCase, SignupInput, SignupUseCase,
};
use crate::domain::provider::AuthProvider;
use crate::domain::route::AccessPolicy;
use crate::domain::session::SessionState;
use crate::error::GateError;
use crate::infra::cookie_store::CookieTokenStore;
use crate::presentation::dto::{
    ActivationQuery, LoginRequest, OperationResponse, SessionStatusResponse, SignupRequest,
};

/// Shared state for the gate handlers and middleware
pub struct GateAppState<P, S>
where
    P: AuthProvider + Send + Sync + 'static,
    S: AttemptStore + Send + Sync + 'static,
{
    pub provider: Arc<P>,
    pub attempts: Arc<S>,
    pub config: Arc<GateConfig>,
    pub policy: Arc<AccessPolicy>,
}

// Manual impl: the derive would demand P: Clone and S: Clone
impl<P, S> Clone for GateAppState<P, S>
where
    P: AuthProvider + Send + Sync + 'static,
    S: AttemptStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            attempts: self.attempts.clone(),
            config: self.config.clone(),
            policy: self.policy.clone(),
        }
    }
}

fn client_addr(headers: &HeaderMap, req_addr: Option<std::net::IpAddr>) -> String {
    client_addr_string(headers, req_addr)
}

/// Expected failures render in-band; internal errors become HTTP 500.
fn failure_response(err: GateError, operation: &'static str) -> Response {
    err.log(operation);
    match err {
        GateError::Internal { .. } => err.to_app_error().into_response(),
        other => Json(OperationResponse::failed(other.user_message())).into_response(),
    }
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
pub async fn login<P, S>(
    State(state): State<GateAppState<P, S>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<LoginRequest>,
) -> Response
where
    P: AuthProvider + Send + Sync + 'static,
    S: AttemptStore + Send + Sync + 'static,
{
    let mut store = CookieTokenStore::from_headers(&headers, state.config.cookie_settings());

    let use_case = LoginUseCase::new(
        state.provider.clone(),
        state.attempts.clone(),
        state.config.clone(),
    );

    let input = LoginInput {
        email: req.email,
        password: req.password,
        remember_me: req.remember_me,
        client_addr: client_addr(&headers, Some(addr.ip())),
    };

    match use_case.execute(input, &mut store).await {
        Ok(identity) => {
            let mut response =
                Json(OperationResponse::ok("Login successful", Some(identity))).into_response();
            store.apply(response.headers_mut());
            response
        }
        Err(err) => failure_response(err, "login"),
    }
}

// ============================================================================
// Signup
// ============================================================================

/// POST /signup
pub async fn signup<P, S>(
    State(state): State<GateAppState<P, S>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<SignupRequest>,
) -> Response
where
    P: AuthProvider + Send + Sync + 'static,
    S: AttemptStore + Send + Sync + 'static,
{
    let use_case = SignupUseCase::new(
        state.provider.clone(),
        state.attempts.clone(),
        state.config.clone(),
    );

    let input = SignupInput {
        name: req.name,
        email: req.email,
        password: req.password,
        client_addr: client_addr(&headers, Some(addr.ip())),
    };

    match use_case.execute(input).await {
        Ok(identity) => Json(OperationResponse::ok(
            "Account created. Please check your email for the activation link.",
            Some(identity),
        ))
        .into_response(),
        Err(err) => failure_response(err, "signup"),
    }
}

// ============================================================================
// Activation
// ============================================================================

/// GET /activation?token=...
pub async fn activation<P, S>(
    State(state): State<GateAppState<P, S>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Query(query): Query<ActivationQuery>,
) -> Response
where
    P: AuthProvider + Send + Sync + 'static,
    S: AttemptStore + Send + Sync + 'static,
{
    let Some(token) = query.token else {
        return Json(OperationResponse::failed(
            "Activation token is missing. Please use the link from your email.",
        ))
        .into_response();
    };

    let use_case = ActivateUseCase::new(
        state.provider.clone(),
        state.attempts.clone(),
        state.config.clone(),
    );

    let input = ActivateInput {
        token,
        client_addr: client_addr(&headers, Some(addr.ip())),
    };

    match use_case.execute(input).await {
        Ok(output) => {
            Json(OperationResponse::ok(output.message, output.identity)).into_response()
        }
        Err(err) => failure_response(err, "activation"),
    }
}

// ============================================================================
// Logout
// ============================================================================

/// POST /logout
///
/// Always succeeds: expires every auth cookie and sends the client
/// back to the login page.
pub async fn logout<P, S>(
    State(state): State<GateAppState<P, S>>,
    headers: HeaderMap,
) -> Response
where
    P: AuthProvider + Send + Sync + 'static,
    S: AttemptStore + Send + Sync + 'static,
{
    let mut store = CookieTokenStore::from_headers(&headers, state.config.cookie_settings());
    store.clear();

    let mut response =
        (StatusCode::SEE_OTHER, [(header::LOCATION, "/login")]).into_response();
    store.apply(response.headers_mut());
    response
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/session
///
/// Reads the session state the gate middleware already resolved.
pub async fn session_status(
    session: Option<axum::Extension<SessionState>>,
) -> Json<SessionStatusResponse> {
    let state = session.map(|s| s.0).unwrap_or(SessionState::Anonymous);

    match state {
        SessionState::Authenticated {
            identity,
            is_admin,
            is_verified,
        } => Json(SessionStatusResponse {
            authenticated: true,
            is_admin,
            is_verified,
            user: Some(identity),
        }),
        SessionState::Anonymous => Json(SessionStatusResponse {
            authenticated: false,
            is_admin: false,
            is_verified: false,
            user: None,
        }),
    }
}
