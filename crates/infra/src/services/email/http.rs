use super::{EmailMessage, EmailReceipt, IEmailSender};
use crate::services::{http_client, reject_unless_success, SendError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::error;

#[derive(Debug, Serialize)]
struct EmailTagBody<'a> {
    name: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    tags: Vec<EmailTagBody<'a>>,
    metadata: &'a HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    #[serde(default)]
    id: Option<String>,
}

/// Sends emails through a JSON HTTP api authenticated with a bearer token
pub struct HttpEmailSender {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpEmailSender {
    pub fn new(api_url: &str, api_key: &str, from: &str, timeout: Duration) -> Self {
        let client = http_client("email", timeout);
        Self {
            client,
            api_url: api_url.trim_end_matches('/').into(),
            api_key: api_key.into(),
            from: from.into(),
        }
    }
}

#[async_trait::async_trait]
impl IEmailSender for HttpEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<EmailReceipt, SendError> {
        let body = SendEmailBody {
            from: &self.from,
            to: vec![&message.to],
            subject: &message.subject,
            html: &message.html,
            text: message.text.as_deref(),
            tags: message
                .tags
                .iter()
                .map(|t| EmailTagBody {
                    name: &t.name,
                    value: &t.value,
                })
                .collect(),
            metadata: &message.metadata,
        };
        let res = self
            .client
            .post(&format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("[Network Error] Email API POST error. Error message: {:?}", e);
                SendError::from(e)
            })?;
        let res = reject_unless_success(res).await?;
        let message_id = match res.json::<SendEmailResponse>().await {
            Ok(body) => body.id,
            Err(e) => {
                error!(
                    "[Unexpected Response] Email API POST error. Error message: {:?}",
                    e
                );
                None
            }
        };
        Ok(EmailReceipt {
            provider: "http".into(),
            message_id,
        })
    }
}
