use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey};
use serde::Deserialize;
use tokio::sync::{OnceCell, RwLock};

use super::jwt::{self, Claims};
use super::{AuthError, IdentityProvider, TokenSet};
use crate::config::OidcConfig;

/// Subset of the provider's discovery document that we use
#[derive(Debug, Clone, Deserialize)]
struct Discovery {
    issuer: String,
    authorization_endpoint: String,
    token_endpoint: String,
    jwks_uri: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: Option<String>,
}

/// OpenID Connect client for an external identity provider
///
/// Discovery and the signing key set are fetched on first use and cached for
/// the life of the process. A token signed with an unknown `kid` triggers a
/// single key-set refresh, which picks up provider key rotation.
pub struct OidcProvider {
    client: reqwest::Client,
    config: OidcConfig,
    discovery: OnceCell<Discovery>,
    keys: RwLock<Option<JwkSet>>,
}

impl OidcProvider {
    pub fn new(client: reqwest::Client, config: OidcConfig) -> Self {
        Self {
            client,
            config,
            discovery: OnceCell::new(),
            keys: RwLock::new(None),
        }
    }

    async fn discovery(&self) -> Result<&Discovery, AuthError> {
        self.discovery
            .get_or_try_init(|| async {
                let url = format!(
                    "{}/.well-known/openid-configuration",
                    self.config.issuer.trim_end_matches('/')
                );
                tracing::debug!(%url, "Fetching OIDC discovery document");

                let response = self.client.get(&url).send().await?;
                if !response.status().is_success() {
                    return Err(AuthError::Provider(format!(
                        "discovery returned {}",
                        response.status()
                    )));
                }
                Ok::<_, AuthError>(response.json::<Discovery>().await?)
            })
            .await
    }

    async fn fetch_keys(&self) -> Result<JwkSet, AuthError> {
        let discovery = self.discovery().await?;
        let response = self.client.get(&discovery.jwks_uri).send().await?;
        if !response.status().is_success() {
            return Err(AuthError::Provider(format!(
                "key set returned {}",
                response.status()
            )));
        }
        Ok(response.json::<JwkSet>().await?)
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(keys) = self.keys.read().await.as_ref() {
            if let Some(jwk) = keys.find(kid) {
                return Ok(DecodingKey::from_jwk(jwk)?);
            }
        }

        tracing::info!(kid, "Refreshing identity provider signing keys");
        let fresh = self.fetch_keys().await?;
        let key = fresh.find(kid).map(DecodingKey::from_jwk).transpose()?;
        *self.keys.write().await = Some(fresh);

        key.ok_or_else(|| AuthError::UnknownKey(kid.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for OidcProvider {
    async fn authorization_url(&self, state: &str) -> Result<String, AuthError> {
        let discovery = self.discovery().await?;
        let url = url::Url::parse_with_params(
            &discovery.authorization_endpoint,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("scope", "openid profile email"),
                ("state", state),
            ],
        )
        .map_err(|e| AuthError::Provider(format!("invalid authorization endpoint: {}", e)))?;

        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AuthError> {
        let discovery = self.discovery().await?;
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_url.as_str()),
        ];

        let response = self
            .client
            .post(&discovery.token_endpoint)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AuthError::Exchange(format!("{}: {}", status, text)));
        }

        let tokens: TokenResponse = response.json().await?;
        let id_token = tokens
            .id_token
            .ok_or_else(|| AuthError::Exchange("response has no id_token".to_string()))?;

        Ok(TokenSet { id_token })
    }

    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = jwt::peek_header(token)?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::UnsupportedAlgorithm(format!("{:?}", header.alg)));
        }
        let kid = header
            .kid
            .ok_or_else(|| AuthError::UnknownKey("<missing kid>".to_string()))?;

        let key = self.decoding_key(&kid).await?;
        let discovery = self.discovery().await?;
        let validation =
            jwt::validation_for(Algorithm::RS256, &discovery.issuer, &self.config.client_id);

        jwt::verify_token(token, &key, &validation)
    }
}
