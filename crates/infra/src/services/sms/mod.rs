mod http;
mod inmemory;

pub use http::HttpSmsSender;
pub use inmemory::{InMemorySmsSender, SentSms};

use super::SendError;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct SmsReceipt {
    pub provider: String,
    pub message_id: Option<String>,
}

#[async_trait::async_trait]
pub trait ISmsSender: Send + Sync {
    /// `to` is an E.164 phone number, `message` a single segment of plain ASCII
    async fn send(&self, to: &str, message: &str) -> Result<SmsReceipt, SendError>;
}

/// Logs the sms instead of sending it
pub struct DryRunSmsSender {}

#[async_trait::async_trait]
impl ISmsSender for DryRunSmsSender {
    async fn send(&self, to: &str, message: &str) -> Result<SmsReceipt, SendError> {
        info!("[DRY RUN] Sms to: {}, message: {}", to, message);
        Ok(SmsReceipt {
            provider: "dry_run".into(),
            message_id: None,
        })
    }
}

pub struct DisabledSmsSender {}

#[async_trait::async_trait]
impl ISmsSender for DisabledSmsSender {
    async fn send(&self, _to: &str, _message: &str) -> Result<SmsReceipt, SendError> {
        Err(SendError::NotConfigured("sms"))
    }
}
