//! Gate Configuration
//!
//! Process-wide settings consumed by the validator, decision engine
//! and orchestrators. Immutable after startup.

use platform::cookie::{CookieSettings, SameSite};
use platform::rate_limit::RateLimitConfig;

/// Gate configuration
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Whether cookies require Secure (off for local development)
    pub cookie_secure: bool,
    /// SameSite policy for auth cookies
    pub cookie_same_site: SameSite,
    /// Re-validate the bearer token against the provider on every
    /// request. When false the cached identity cookie is trusted
    /// (legacy posture; a tampered cookie could forge role or
    /// activation flags).
    pub remote_validation: bool,
    /// Login attempts: 5 per 30 minutes
    pub login_limit: RateLimitConfig,
    /// Signup attempts: 3 per hour
    pub signup_limit: RateLimitConfig,
    /// Activation attempts: 5 per 15 minutes
    pub activation_limit: RateLimitConfig,
    /// Where authenticated users land when no redirect is requested
    pub default_destination: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            remote_validation: true,
            login_limit: RateLimitConfig::new(5, 30 * 60),
            signup_limit: RateLimitConfig::new(3, 60 * 60),
            activation_limit: RateLimitConfig::new(5, 15 * 60),
            default_destination: "/dashboard".to_string(),
        }
    }
}

impl GateConfig {
    /// Config for local development (insecure cookies)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::default()
        }
    }

    pub fn cookie_settings(&self) -> CookieSettings {
        CookieSettings {
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
        }
    }
}
