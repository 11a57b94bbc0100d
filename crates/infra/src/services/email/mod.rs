mod http;
mod inmemory;

pub use http::HttpEmailSender;
pub use inmemory::InMemoryEmailSender;

use super::SendError;
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct EmailTag {
    pub name: String,
    pub value: String,
}

impl EmailTag {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: Option<String>,
    /// Echoed back by the provider on webhook events
    pub tags: Vec<EmailTag>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailReceipt {
    pub provider: String,
    pub message_id: Option<String>,
}

#[async_trait::async_trait]
pub trait IEmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<EmailReceipt, SendError>;
}

/// Logs the email instead of sending it
pub struct DryRunEmailSender {}

#[async_trait::async_trait]
impl IEmailSender for DryRunEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<EmailReceipt, SendError> {
        info!(
            "[DRY RUN] Email to: {}, subject: {}, tags: {:?}",
            message.to, message.subject, message.tags
        );
        Ok(EmailReceipt {
            provider: "dry_run".into(),
            message_id: Some(format!("dry-run-{}", uuid::Uuid::new_v4())),
        })
    }
}

/// Used when the email channel has neither credentials nor dry run enabled
pub struct DisabledEmailSender {}

#[async_trait::async_trait]
impl IEmailSender for DisabledEmailSender {
    async fn send(&self, _message: &EmailMessage) -> Result<EmailReceipt, SendError> {
        Err(SendError::NotConfigured("email"))
    }
}
