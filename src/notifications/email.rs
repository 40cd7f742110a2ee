use async_trait::async_trait;
use serde::Serialize;

use super::{EmailSender, NotificationError};

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

/// Email sender backed by the Resend HTTP API
#[derive(Clone)]
pub struct ResendEmailSender {
    client: reqwest::Client,
    api_key: String,
    from_address: String,
}

impl ResendEmailSender {
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        from_address: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            from_address: from_address.into(),
        }
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        let request = SendEmailRequest {
            from: &self.from_address,
            to: [to],
            subject,
            text: body,
        };

        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected(format!("{}: {}", status, text)));
        }

        tracing::debug!(to, subject, "Email accepted by Resend");
        Ok(())
    }
}
