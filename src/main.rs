use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use storefront_api::api::middleware::login_session_layer;
use storefront_api::api::{self, AppState, Channels, Repositories};
use storefront_api::auth::OidcProvider;
use storefront_api::config::AppConfig;
use storefront_api::infrastructure::database;
use storefront_api::notifications::{
    AfricasTalkingSms, EmailSender, LogSender, ResendEmailSender, SmsSender,
};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("storefront_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Connect to database
    let pool = database::connect(&config.database)
        .await
        .expect("Failed to connect to database");

    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .expect("Failed to build HTTP client");

    let identity = Arc::new(OidcProvider::new(http.clone(), config.oidc.clone()));
    let channels = Channels {
        email: email_sender(&config, &http),
        sms: sms_sender(&config, &http),
        admin_address: config.email.admin_address.clone(),
    };
    if channels.admin_address.is_none() {
        tracing::warn!("ADMIN_EMAIL not set, order emails will not be sent");
    }

    let state = AppState::new(Repositories::postgres(pool.clone()), identity, channels);

    // Build router
    let secure_cookies = config.oidc.redirect_url.starts_with("https://");
    let app = api::router(state, login_session_layer(secure_cookies))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_allowed_origins));

    // Start server
    let addr = config.socket_addr();
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");

    pool.close().await;
    tracing::info!("Server stopped");
}

fn email_sender(config: &AppConfig, http: &reqwest::Client) -> Arc<dyn EmailSender> {
    match &config.email.api_key {
        Some(key) => Arc::new(ResendEmailSender::new(
            http.clone(),
            key.clone(),
            config.email.from_address.clone(),
        )),
        None => {
            tracing::warn!("RESEND_API_KEY not set, emails will be logged only");
            Arc::new(LogSender)
        }
    }
}

fn sms_sender(config: &AppConfig, http: &reqwest::Client) -> Arc<dyn SmsSender> {
    match (&config.sms.username, &config.sms.api_key) {
        (Some(username), Some(api_key)) => Arc::new(AfricasTalkingSms::new(
            http.clone(),
            username.clone(),
            api_key.clone(),
            config.sms.url.clone(),
        )),
        _ => {
            tracing::warn!("Africa's Talking credentials not set, SMS will be logged only");
            Arc::new(LogSender)
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
