//! Access Decision Engine
//!
//! Combines the route class with the session state into a single
//! decision for the request pipeline. The ordering is deliberate:
//! admin and protected checks are security-critical and short-circuit
//! before any redirect convenience logic runs.

use axum::http::StatusCode;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::domain::route::{AccessPolicy, RouteClass, RouteDecision};
use crate::domain::session::SessionState;

/// Characters escaped inside a query-string value
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'&')
    .add(b'=')
    .add(b'?')
    .add(b'+');

fn login_redirect(path: &str) -> RouteDecision {
    let encoded = utf8_percent_encode(path, QUERY_VALUE);
    RouteDecision::redirect(format!("/login?redirectTo={encoded}"))
}

/// Decide what happens to a request for `path` in session `state`.
///
/// `redirect_param` is the `redirectTo` query value, honored only when
/// bouncing an authenticated user off an auth form;
/// `default_destination` is where they land without one.
pub fn decide(
    policy: &AccessPolicy,
    path: &str,
    state: &SessionState,
    redirect_param: Option<&str>,
    default_destination: &str,
) -> RouteDecision {
    let class = policy.classify(path);

    match class {
        RouteClass::Admin => {
            if !state.is_authenticated() {
                return login_redirect(path);
            }
            if !state.is_admin() {
                return RouteDecision::reject(
                    StatusCode::FORBIDDEN,
                    "Access denied: admin privileges required.",
                );
            }
        }
        RouteClass::Protected => {
            if !state.is_authenticated() {
                // API callers get a status code, browsers get the login page
                if path.starts_with("/api") {
                    return RouteDecision::reject(
                        StatusCode::UNAUTHORIZED,
                        "Authentication required. You must be logged in to access this resource.",
                    );
                }
                return login_redirect(path);
            }
        }
        RouteClass::AuthOnly => {
            if state.is_authenticated() {
                let destination = redirect_param
                    .filter(|p| !p.is_empty())
                    .unwrap_or(default_destination);
                return RouteDecision::redirect(destination);
            }
        }
        RouteClass::Public => {}
    }

    // Unverified users are funneled to the verify-email page, except
    // for the few paths they need to complete verification or leave.
    if let SessionState::Authenticated {
        identity,
        is_verified: false,
        ..
    } = state
    {
        if class == RouteClass::Protected && !policy.is_verification_exempt(path) {
            let email = utf8_percent_encode(&identity.email, QUERY_VALUE);
            return RouteDecision::redirect(format!("/verify-email?email={email}"));
        }
    }

    RouteDecision::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::{Identity, Role};

    fn identity(activated: bool, role: Role) -> Identity {
        Identity {
            id: "u-1".to_string(),
            name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
            created_at: "2025-01-01T00:00:00Z".parse().unwrap(),
            activated,
            role,
        }
    }

    fn verified_user() -> SessionState {
        SessionState::authenticated(identity(true, Role::User))
    }

    fn unverified_user() -> SessionState {
        SessionState::authenticated(identity(false, Role::User))
    }

    fn admin() -> SessionState {
        SessionState::authenticated(identity(true, Role::Admin))
    }

    fn run(
        policy: &AccessPolicy,
        path: &str,
        state: &SessionState,
        redirect_param: Option<&str>,
    ) -> RouteDecision {
        decide(policy, path, state, redirect_param, "/dashboard")
    }

    #[test]
    fn test_anonymous_on_public_continues() {
        let policy = AccessPolicy::default();
        let decision = run(&policy, "/", &SessionState::Anonymous, None);
        assert_eq!(decision, RouteDecision::Continue);
    }

    #[test]
    fn test_anonymous_on_protected_redirects_to_login() {
        let policy = AccessPolicy::default();
        let decision = run(&policy, "/dashboard", &SessionState::Anonymous, None);
        assert_eq!(
            decision,
            RouteDecision::RedirectTo {
                location: "/login?redirectTo=/dashboard".to_string(),
                status: StatusCode::SEE_OTHER,
            }
        );
    }

    #[test]
    fn test_anonymous_on_api_is_rejected_with_401() {
        let policy = AccessPolicy::default();
        let decision = run(&policy, "/api/anything", &SessionState::Anonymous, None);
        match decision {
            RouteDecision::Reject { status, .. } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
            }
            other => panic!("expected reject, got {other:?}"),
        }
    }

    #[test]
    fn test_health_endpoints_stay_public() {
        let policy = AccessPolicy::default();
        assert_eq!(
            run(&policy, "/api/health", &SessionState::Anonymous, None),
            RouteDecision::Continue
        );
        assert_eq!(
            run(&policy, "/health", &SessionState::Anonymous, None),
            RouteDecision::Continue
        );
    }

    #[test]
    fn test_anonymous_on_admin_redirects_to_login() {
        let policy = AccessPolicy::default();
        let decision = run(&policy, "/admin/users", &SessionState::Anonymous, None);
        assert_eq!(
            decision,
            RouteDecision::RedirectTo {
                location: "/login?redirectTo=/admin/users".to_string(),
                status: StatusCode::SEE_OTHER,
            }
        );
    }

    #[test]
    fn test_non_admin_on_admin_is_forbidden() {
        let policy = AccessPolicy::default();
        let decision = run(&policy, "/admin/x", &verified_user(), None);
        match decision {
            RouteDecision::Reject { status, .. } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
            }
            other => panic!("expected reject, got {other:?}"),
        }
    }

    #[test]
    fn test_admin_on_admin_continues() {
        let policy = AccessPolicy::default();
        let decision = run(&policy, "/admin/users", &admin(), None);
        assert_eq!(decision, RouteDecision::Continue);
    }

    #[test]
    fn test_authenticated_on_auth_route_is_bounced() {
        let policy = AccessPolicy::default();

        let decision = run(&policy, "/login", &verified_user(), None);
        assert_eq!(decision, RouteDecision::redirect("/dashboard"));

        let decision = run(&policy, "/login", &verified_user(), Some("/settings"));
        assert_eq!(decision, RouteDecision::redirect("/settings"));
    }

    #[test]
    fn test_auth_route_bounce_honors_configured_destination() {
        let policy = AccessPolicy::default();
        let decision = decide(&policy, "/login", &verified_user(), None, "/home");
        assert_eq!(decision, RouteDecision::redirect("/home"));
    }

    #[test]
    fn test_anonymous_on_auth_route_continues() {
        let policy = AccessPolicy::default();
        let decision = run(&policy, "/login", &SessionState::Anonymous, None);
        assert_eq!(decision, RouteDecision::Continue);
    }

    #[test]
    fn test_unverified_on_protected_goes_to_verify_email() {
        let policy = AccessPolicy::default();
        let decision = run(&policy, "/settings", &unverified_user(), None);
        assert_eq!(
            decision,
            RouteDecision::RedirectTo {
                location: "/verify-email?email=jo@example.com".to_string(),
                status: StatusCode::SEE_OTHER,
            }
        );
    }

    #[test]
    fn test_unverified_exemptions_continue() {
        let policy = AccessPolicy::default();
        assert_eq!(
            run(&policy, "/logout", &unverified_user(), None),
            RouteDecision::Continue
        );
        assert_eq!(
            run(&policy, "/api/auth/session", &unverified_user(), None),
            RouteDecision::Continue
        );
    }

    #[test]
    fn test_verified_on_protected_continues() {
        let policy = AccessPolicy::default();
        let decision = run(&policy, "/settings", &verified_user(), None);
        assert_eq!(decision, RouteDecision::Continue);
    }

    #[test]
    fn test_redirect_path_with_query_unsafe_chars_is_escaped() {
        let policy = AccessPolicy::default();
        let decision = run(&policy, "/dashboard/a b", &SessionState::Anonymous, None);
        assert_eq!(
            decision,
            RouteDecision::RedirectTo {
                location: "/login?redirectTo=/dashboard/a%20b".to_string(),
                status: StatusCode::SEE_OTHER,
            }
        );
    }
}
