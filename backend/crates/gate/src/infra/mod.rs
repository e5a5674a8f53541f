//! Infrastructure Layer
//!
//! Cookie-backed token store and the HTTP auth provider client.

pub mod cookie_store;
pub mod http_provider;

pub use cookie_store::CookieTokenStore;
pub use http_provider::{AuthEndpoints, HttpAuthProvider};
