use super::{ISmsSender, SmsReceipt};
use crate::services::{http_client, reject_unless_success, SendError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::error;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendSmsForm<'a> {
    to: &'a str,
    from: &'a str,
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendSmsResponse {
    #[serde(default)]
    sid: Option<String>,
}

/// Sends sms through a form encoded HTTP api authenticated with an
/// account sid and an auth token
pub struct HttpSmsSender {
    client: Client,
    api_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl HttpSmsSender {
    pub fn new(
        api_url: &str,
        account_sid: &str,
        auth_token: &str,
        from_number: &str,
        timeout: Duration,
    ) -> Self {
        let client = http_client("sms", timeout);
        Self {
            client,
            api_url: api_url.trim_end_matches('/').into(),
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from_number: from_number.into(),
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/Accounts/{}/Messages.json", self.api_url, self.account_sid)
    }
}

#[async_trait::async_trait]
impl ISmsSender for HttpSmsSender {
    async fn send(&self, to: &str, message: &str) -> Result<SmsReceipt, SendError> {
        let form = SendSmsForm {
            to,
            from: &self.from_number,
            body: message,
        };
        let res = self
            .client
            .post(&self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                error!("[Network Error] Sms API POST error. Error message: {:?}", e);
                SendError::from(e)
            })?;
        let res = reject_unless_success(res).await?;
        let message_id = match res.json::<SendSmsResponse>().await {
            Ok(body) => body.sid,
            Err(e) => {
                error!(
                    "[Unexpected Response] Sms API POST error. Error message: {:?}",
                    e
                );
                None
            }
        };
        Ok(SmsReceipt {
            provider: "http".into(),
            message_id,
        })
    }
}
