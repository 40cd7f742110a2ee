//! Session layer for the login flow.
//!
//! Only the pending login state lives in the session; API requests
//! authenticate with bearer tokens and never touch it.

use tower_sessions::cookie::{time::Duration, SameSite};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

/// Session cookie name
pub const SESSION_COOKIE_NAME: &str = "storefront_login";

/// A login must complete within this many minutes
const LOGIN_EXPIRY_MINUTES: i64 = 10;

/// Session layer scoped to the `/api/auth` routes
///
/// `secure` marks the cookie HTTPS-only.
pub fn login_session_layer(secure: bool) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(LOGIN_EXPIRY_MINUTES)))
        .with_secure(secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/api/auth")
}
