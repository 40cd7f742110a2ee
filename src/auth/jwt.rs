// Identity token verification
// Decodes provider-issued JWTs into typed claims after signature checks

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Verified identity claims
///
/// # Fields
/// * `sub` - Subject (the provider's user id)
/// * `exp` - Expiry time (seconds since epoch)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Provider user id (subject)
    pub sub: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
    /// Expiry timestamp (seconds since epoch)
    pub exp: usize,
}

/// Builds the validation rules for provider tokens
///
/// Signature algorithm, issuer, audience and expiry are all enforced.
pub fn validation_for(algorithm: Algorithm, issuer: &str, audience: &str) -> Validation {
    let mut validation = Validation::new(algorithm);
    validation.set_issuer(&[issuer]);
    validation.set_audience(&[audience]);
    validation
}

/// Reads the token header without verifying anything
pub fn peek_header(token: &str) -> Result<jsonwebtoken::Header, AuthError> {
    Ok(decode_header(token)?)
}

/// Verifies and decodes a JWT token
///
/// # Returns
/// * `Ok(Claims)` - The decoded claims if token is valid
/// * `Err(AuthError)` - If the signature, issuer, audience or expiry check fails
pub fn verify_token(
    token: &str,
    key: &DecodingKey,
    validation: &Validation,
) -> Result<Claims, AuthError> {
    decode::<Claims>(token, key, validation)
        .map(|data| data.claims)
        .map_err(AuthError::from)
}
