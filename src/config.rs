//! Application configuration.
//!
//! Loaded from environment variables (a `.env` file is honoured in `main`)
//! with defaults for everything that has a sensible local value.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

/// Database settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    pub url: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

/// External identity provider (OIDC authorization-code flow)
#[derive(Debug, Clone)]
pub struct OidcConfig {
    /// Issuer URL, e.g. `https://tenant.eu.auth0.com/`
    pub issuer: String,
    pub client_id: String,
    pub client_secret: String,
    /// Where the provider sends the user back with `?code=`
    pub redirect_url: String,
}

/// Transactional email (Resend)
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// `None` disables delivery; messages are logged instead
    pub api_key: Option<String>,
    pub from_address: String,
    /// Recipient of new-order notifications
    pub admin_address: Option<String>,
}

/// SMS gateway (Africa's Talking)
#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub username: Option<String>,
    pub api_key: Option<String>,
    pub url: String,
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub database: DatabaseConfig,
    pub oidc: OidcConfig,
    pub email: EmailConfig,
    pub sms: SmsConfig,
    /// Allowed CORS origins; empty allows any origin
    pub cors_allowed_origins: Vec<String>,
    /// Timeout applied to every outbound HTTP call
    pub http_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = AppConfig {
            host: parse_or("HOST", "0.0.0.0")?,
            port: parse_or("PORT", "8080")?,
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parse_or("DATABASE_MAX_CONNECTIONS", "5")?,
            },
            oidc: OidcConfig {
                issuer: required("OIDC_ISSUER")?,
                client_id: required("OIDC_CLIENT_ID")?,
                client_secret: required("OIDC_CLIENT_SECRET")?,
                redirect_url: required("OIDC_REDIRECT_URL")?,
            },
            email: EmailConfig {
                api_key: optional("RESEND_API_KEY"),
                from_address: env::var("EMAIL_FROM")
                    .unwrap_or_else(|_| "orders@localhost".to_string()),
                admin_address: optional("ADMIN_EMAIL"),
            },
            sms: SmsConfig {
                username: optional("AFRICASTALKING_USERNAME"),
                api_key: optional("AFRICASTALKING_API_KEY"),
                url: env::var("AFRICASTALKING_URL").unwrap_or_else(|_| {
                    "https://api.africastalking.com/version1/messaging".to_string()
                }),
            },
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|value| split_list(&value))
                .unwrap_or_default(),
            http_timeout: Duration::from_secs(parse_or("HTTP_TIMEOUT_SECS", "10")?),
        };

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn required(key: &str) -> Result<String, ConfigError> {
    optional(key).ok_or_else(|| ConfigError::MissingRequired(key.to_string()))
}

/// Unset and blank variables both count as absent
fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_or<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key.to_string()))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_list_is_trimmed() {
        assert_eq!(
            split_list(" http://localhost:3000, ,https://shop.example "),
            vec!["http://localhost:3000", "https://shop.example"]
        );
    }

    #[test]
    fn empty_origin_list() {
        assert!(split_list("").is_empty());
    }

    #[test]
    fn parse_default_is_used_for_unset_variable() {
        let port: u16 = parse_or("STOREFRONT_TEST_UNSET_PORT", "8080").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn missing_required_is_reported_by_name() {
        let error = required("STOREFRONT_TEST_UNSET_REQUIRED").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Missing required configuration: STOREFRONT_TEST_UNSET_REQUIRED"
        );
    }
}
