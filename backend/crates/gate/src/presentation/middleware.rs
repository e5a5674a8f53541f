//! Gate Middleware
//!
//! Runs in front of every route: resolves the session state from the
//! auth cookies, classifies the path, and either forwards the request
//! (with the session state in its extensions) or short-circuits with a
//! redirect or rejection. Cookie mutations made during validation are
//! applied to whichever response leaves.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::client::{client_addr_string, extract_user_agent};
use platform::rate_limit::AttemptStore;

use crate::application::decide;
use crate::application::validate_session::SessionValidator;
use crate::domain::provider::AuthProvider;
use crate::domain::route::RouteDecision;
use crate::infra::cookie_store::CookieTokenStore;
use crate::presentation::handlers::GateAppState;

/// Extract and sanitize the `redirectTo` query value.
///
/// Only same-site absolute paths survive; anything that could leave
/// the origin (full URLs, protocol-relative `//host`) is dropped.
fn parse_redirect_param(query: Option<&str>) -> Option<String> {
    let query = query?;
    let raw = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "redirectTo")
        .map(|(_, value)| value)?;

    let decoded = percent_decode_str(raw).decode_utf8().ok()?.into_owned();
    if decoded.starts_with('/') && !decoded.starts_with("//") {
        Some(decoded)
    } else {
        None
    }
}

fn reject_response(path: &str, status: StatusCode, message: &'static str) -> Response {
    // API callers get the structured error body, pages get plain text
    if path.starts_with("/api") {
        let kind = match status {
            StatusCode::UNAUTHORIZED => ErrorKind::Unauthorized,
            StatusCode::FORBIDDEN => ErrorKind::Forbidden,
            _ => ErrorKind::InternalServerError,
        };
        AppError::new(kind, message).into_response()
    } else {
        (status, message).into_response()
    }
}

/// Gate every request through the access policy
pub async fn route_gate<P, S>(
    State(state): State<GateAppState<P, S>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    P: AuthProvider + Send + Sync + 'static,
    S: AttemptStore + Send + Sync + 'static,
{
    let path = req.uri().path().to_string();
    let redirect_param = parse_redirect_param(req.uri().query());

    let req_ip = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip());
    let client = client_addr_string(req.headers(), req_ip);
    let user_agent = extract_user_agent(req.headers(), 120);

    let mut store = CookieTokenStore::from_headers(req.headers(), state.config.cookie_settings());

    let validator = SessionValidator::new(state.provider.clone(), state.config.clone());
    let session = validator.validate(&mut store).await;

    let decision = decide(
        &state.policy,
        &path,
        &session,
        redirect_param.as_deref(),
        &state.config.default_destination,
    );

    let mut response = match decision {
        RouteDecision::Continue => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        RouteDecision::RedirectTo { location, status } => {
            tracing::debug!(
                path = %path,
                client = %client,
                user_agent = %user_agent,
                location = %location,
                "gate redirect"
            );
            (status, [(header::LOCATION, location)]).into_response()
        }
        RouteDecision::Reject { status, message } => {
            tracing::debug!(
                path = %path,
                client = %client,
                user_agent = %user_agent,
                status = status.as_u16(),
                "gate reject"
            );
            reject_response(&path, status, message)
        }
    };

    // Expired or invalidated cookies are cleared on every exit path,
    // but never over a cookie the handler just set.
    store.apply_unless_set(response.headers_mut());
    response
}
