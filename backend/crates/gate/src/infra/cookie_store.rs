//! Cookie Token Store
//!
//! Persists the auth artifact across requests as a set of HttpOnly
//! cookies. Reads come from the request headers; writes accumulate as
//! pending Set-Cookie values the caller applies to the response before
//! it is returned, so the client's next request always observes a
//! consistent artifact.

use axum::http::{HeaderMap, HeaderValue, header};
use chrono::{DateTime, Utc};
use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use platform::cookie::{CookieSettings, extract_cookie};

use crate::domain::artifact::AuthArtifact;
use crate::domain::identity::Identity;

pub const BEARER_TOKEN_COOKIE: &str = "bearer_token";
pub const TOKEN_EXPIRY_COOKIE: &str = "token_expiry";
pub const USER_DATA_COOKIE: &str = "user_data";
pub const REMEMBER_ME_COOKIE: &str = "remember_me";

/// Used when the computed token lifetime is non-positive (1 day)
const FALLBACK_MAX_AGE_SECS: i64 = 60 * 60 * 24;
/// Lifetime of the remember-me marker (1 year)
const REMEMBER_ME_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 365;

/// Per-request adapter over the persisted auth cookies
#[derive(Debug, Clone)]
pub struct CookieTokenStore {
    settings: CookieSettings,
    token: Option<String>,
    expiry: Option<String>,
    user_data: Option<String>,
    pending: Vec<String>,
}

impl CookieTokenStore {
    pub fn from_headers(headers: &HeaderMap, settings: CookieSettings) -> Self {
        Self {
            settings,
            token: extract_cookie(headers, BEARER_TOKEN_COOKIE),
            expiry: extract_cookie(headers, TOKEN_EXPIRY_COOKIE),
            user_data: extract_cookie(headers, USER_DATA_COOKIE),
            pending: Vec::new(),
        }
    }

    /// Read the persisted artifact.
    ///
    /// Returns None unless both the token and a well-formed expiry are
    /// present; there are no partial artifacts. The identity snapshot
    /// is optional and dropped silently when it fails to parse.
    pub fn read(&self) -> Option<AuthArtifact> {
        let token = self.token.as_deref()?;
        let expiry = self.expiry.as_deref()?;
        let expiry: DateTime<Utc> = DateTime::parse_from_rfc3339(expiry)
            .ok()?
            .with_timezone(&Utc);

        let identity = self.user_data.as_deref().and_then(decode_identity);

        Some(AuthArtifact::new(token, expiry, identity))
    }

    /// Persist a fresh artifact.
    ///
    /// Cookie Max-Age matches the token lifetime, falling back to one
    /// day when the computed lifetime is non-positive. The remember-me
    /// marker is only set when requested.
    pub fn write(&mut self, artifact: &AuthArtifact, remember_me: bool) {
        let lifetime = artifact.lifetime_secs(Utc::now());
        let max_age = if lifetime > 0 {
            lifetime
        } else {
            FALLBACK_MAX_AGE_SECS
        };

        self.pending
            .push(self.settings.build(BEARER_TOKEN_COOKIE, &artifact.token, max_age));
        self.pending.push(self.settings.build(
            TOKEN_EXPIRY_COOKIE,
            &artifact.expiry.to_rfc3339(),
            max_age,
        ));

        if let Some(identity) = &artifact.identity {
            if let Ok(json) = serde_json::to_string(identity) {
                let encoded = utf8_percent_encode(&json, NON_ALPHANUMERIC).to_string();
                self.pending
                    .push(self.settings.build(USER_DATA_COOKIE, &encoded, max_age));
            }
        }

        if remember_me {
            self.pending.push(self.settings.build(
                REMEMBER_ME_COOKIE,
                "true",
                REMEMBER_ME_MAX_AGE_SECS,
            ));
        }
    }

    /// Expire every auth cookie.
    pub fn clear(&mut self) {
        for name in [
            BEARER_TOKEN_COOKIE,
            TOKEN_EXPIRY_COOKIE,
            USER_DATA_COOKIE,
            REMEMBER_ME_COOKIE,
        ] {
            self.pending.push(self.settings.build_removal(name));
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    /// Append pending Set-Cookie values to response headers.
    pub fn apply(&self, headers: &mut HeaderMap) {
        for cookie in &self.pending {
            if let Ok(value) = HeaderValue::from_str(cookie) {
                headers.append(header::SET_COOKIE, value);
            }
        }
    }

    /// Append pending Set-Cookie values, skipping any cookie name the
    /// response already sets.
    ///
    /// A handler's fresh cookie must win over a removal queued earlier
    /// in the request (RFC 6265: the client honors the last value for
    /// a name), so queued clears never cancel a cookie written after
    /// them.
    pub fn apply_unless_set(&self, headers: &mut HeaderMap) {
        let taken: Vec<String> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(cookie_name)
            .collect();

        for cookie in &self.pending {
            if cookie_name(cookie).is_some_and(|name| taken.contains(&name)) {
                continue;
            }
            if let Ok(value) = HeaderValue::from_str(cookie) {
                headers.append(header::SET_COOKIE, value);
            }
        }
    }
}

fn cookie_name(cookie: &str) -> Option<String> {
    cookie.split('=').next().map(|name| name.trim().to_string())
}

fn decode_identity(raw: &str) -> Option<Identity> {
    let json = percent_decode_str(raw).decode_utf8().ok()?;
    serde_json::from_str(&json).ok()
}
