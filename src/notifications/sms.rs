use async_trait::async_trait;
use serde::Deserialize;

use super::{NotificationError, SmsSender};

#[derive(Debug, Deserialize)]
struct SmsResponse {
    #[serde(rename = "SMSMessageData")]
    data: SmsMessageData,
}

#[derive(Debug, Deserialize)]
struct SmsMessageData {
    #[serde(rename = "Recipients", default)]
    recipients: Vec<Recipient>,
}

#[derive(Debug, Deserialize)]
struct Recipient {
    status: String,
}

impl SmsResponse {
    /// The single recipient must report `Success`
    fn into_result(self) -> Result<(), NotificationError> {
        match self.data.recipients.first() {
            None => Err(NotificationError::Rejected(
                "no recipients in response".to_string(),
            )),
            Some(recipient) if recipient.status == "Success" => Ok(()),
            Some(recipient) => Err(NotificationError::Rejected(recipient.status.clone())),
        }
    }
}

/// SMS sender backed by the Africa's Talking messaging API
#[derive(Clone)]
pub struct AfricasTalkingSms {
    client: reqwest::Client,
    username: String,
    api_key: String,
    url: String,
}

impl AfricasTalkingSms {
    pub fn new(
        client: reqwest::Client,
        username: impl Into<String>,
        api_key: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            username: username.into(),
            api_key: api_key.into(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl SmsSender for AfricasTalkingSms {
    async fn send_sms(&self, to: &str, message: &str) -> Result<(), NotificationError> {
        let params = [
            ("username", self.username.as_str()),
            ("to", to),
            ("message", message),
            ("enqueue", "1"),
        ];

        let response = self
            .client
            .post(&self.url)
            .header("apiKey", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected(format!("{}: {}", status, text)));
        }

        response.json::<SmsResponse>().await?.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<(), NotificationError> {
        serde_json::from_str::<SmsResponse>(body).unwrap().into_result()
    }

    #[test]
    fn success_status_is_accepted() {
        let body = r#"{"SMSMessageData":{"Message":"Sent to 1/1","Recipients":[
            {"statusCode":101,"number":"+254700000000","status":"Success","cost":"KES 0.8000"}
        ]}}"#;
        assert!(parse(body).is_ok());
    }

    #[test]
    fn failed_status_is_reported() {
        let body = r#"{"SMSMessageData":{"Recipients":[{"status":"InvalidPhoneNumber"}]}}"#;
        match parse(body) {
            Err(NotificationError::Rejected(status)) => assert_eq!(status, "InvalidPhoneNumber"),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn empty_recipients_is_an_error() {
        let body = r#"{"SMSMessageData":{"Message":"InvalidSenderId","Recipients":[]}}"#;
        assert!(parse(body).is_err());
    }
}
