use super::{EmailMessage, EmailReceipt, IEmailSender};
use crate::services::SendError;
use std::sync::Mutex;

/// Keeps sent emails in memory, recipients listed in `failing` get a transport error
pub struct InMemoryEmailSender {
    sent: Mutex<Vec<EmailMessage>>,
    failing: Mutex<Vec<String>>,
}

impl InMemoryEmailSender {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_for(&self, recipient: &str) {
        self.failing.lock().unwrap().push(recipient.into());
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryEmailSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IEmailSender for InMemoryEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<EmailReceipt, SendError> {
        if self.failing.lock().unwrap().contains(&message.to) {
            return Err(SendError::Transport("connection refused".into()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(message.clone());
        Ok(EmailReceipt {
            provider: "inmemory".into(),
            message_id: Some(format!("msg_{}", sent.len())),
        })
    }
}
