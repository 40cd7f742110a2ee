//! Authentication against an external OpenID Connect provider.
//!
//! The service never sees passwords. Users are sent to the provider's login
//! page, the callback exchanges the returned code for an ID token, and every
//! protected request carries that ID token as a bearer credential.

pub mod jwt;
pub mod oidc;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use thiserror::Error;

pub use jwt::Claims;
pub use oidc::OidcProvider;

/// Tokens returned by a successful code exchange
#[derive(Debug, Clone)]
pub struct TokenSet {
    pub id_token: String,
}

/// Authentication failures
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("No signing key matches key id {0}")]
    UnknownKey(String),

    #[error("Code exchange failed: {0}")]
    Exchange(String),

    #[error("Identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Identity provider error: {0}")]
    Provider(String),
}

impl AuthError {
    /// Failures caused by the credential itself rather than by the provider
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken(_)
                | AuthError::UnsupportedAlgorithm(_)
                | AuthError::UnknownKey(_)
                | AuthError::Exchange(_)
        )
    }
}

/// Operations the HTTP layer needs from an identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Provider login URL carrying the given anti-forgery `state`
    async fn authorization_url(&self, state: &str) -> Result<String, AuthError>;

    /// Trade an authorization code for tokens
    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AuthError>;

    /// Verify an ID token and return its claims
    async fn verify(&self, id_token: &str) -> Result<Claims, AuthError>;
}

/// 32 random bytes, base64url encoded
pub fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
