mod email;
mod sms;

pub use email::{
    DisabledEmailSender, DryRunEmailSender, EmailMessage, EmailReceipt, EmailTag,
    HttpEmailSender, IEmailSender, InMemoryEmailSender,
};
pub use sms::{
    DisabledSmsSender, DryRunSmsSender, HttpSmsSender, ISmsSender, InMemorySmsSender, SentSms,
    SmsReceipt,
};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SendError {
    /// The provider could not be reached or did not answer in time
    #[error("Unable to reach the provider: {0}")]
    Transport(String),
    #[error("The provider rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("The {0} channel has no credentials configured")]
    NotConfigured(&'static str),
}

impl From<reqwest::Error> for SendError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Turns a non success response into a `SendError::Rejected`
async fn reject_unless_success(res: reqwest::Response) -> Result<reqwest::Response, SendError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(SendError::Rejected {
        status: status.as_u16(),
        body,
    })
}

/// Http client giving up on a provider after `timeout`
fn http_client(provider: &str, timeout: Duration) -> Client {
    match Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            error!(
                "Unable to build the {} http client with a timeout of {:?}, using the defaults. Error: {:?}",
                provider, timeout, e
            );
            Client::new()
        }
    }
}
