//! Outbound notifications.
//!
//! Order confirmations go out as plain-text email (Resend) to the shop admin
//! and as SMS (Africa's Talking) to the customer. Delivery is best-effort:
//! callers dispatch on a spawned task and only log failures.

pub mod email;
pub mod order_email;
pub mod sms;

use async_trait::async_trait;
use thiserror::Error;

pub use email::ResendEmailSender;
pub use order_email::{build_order_email_body, build_order_sms, ORDER_EMAIL_SUBJECT};
pub use sms::AfricasTalkingSms;

/// Errors that can occur when delivering a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Transport failure talking to the provider.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered but refused the message.
    #[error("Provider rejected message: {0}")]
    Rejected(String),
}

/// Plain-text email delivery
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, body: &str)
        -> Result<(), NotificationError>;
}

/// SMS delivery
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_sms(&self, to: &str, message: &str) -> Result<(), NotificationError>;
}

/// Writes notifications to the log instead of delivering them
///
/// Stands in for a channel whose credentials are not configured, so local
/// development runs the full checkout path.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSender;

#[async_trait]
impl EmailSender for LogSender {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        tracing::info!(to, subject, body, "Email delivery disabled; logging message");
        Ok(())
    }
}

#[async_trait]
impl SmsSender for LogSender {
    async fn send_sms(&self, to: &str, message: &str) -> Result<(), NotificationError> {
        tracing::info!(to, message, "SMS delivery disabled; logging message");
        Ok(())
    }
}
