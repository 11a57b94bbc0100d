use super::{ISmsSender, SmsReceipt};
use crate::services::SendError;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct SentSms {
    pub to: String,
    pub message: String,
}

/// Keeps sent sms in memory, numbers listed in `failing` get a transport error
pub struct InMemorySmsSender {
    sent: Mutex<Vec<SentSms>>,
    failing: Mutex<Vec<String>>,
}

impl InMemorySmsSender {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_for(&self, phone: &str) {
        self.failing.lock().unwrap().push(phone.into());
    }

    pub fn recover(&self, phone: &str) {
        self.failing.lock().unwrap().retain(|p| p != phone);
    }

    pub fn sent(&self) -> Vec<SentSms> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, phone: &str) -> Vec<SentSms> {
        self.sent().into_iter().filter(|s| s.to == phone).collect()
    }
}

impl Default for InMemorySmsSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ISmsSender for InMemorySmsSender {
    async fn send(&self, to: &str, message: &str) -> Result<SmsReceipt, SendError> {
        if self.failing.lock().unwrap().iter().any(|p| p == to) {
            return Err(SendError::Transport("connection refused".into()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(SentSms {
            to: to.into(),
            message: message.into(),
        });
        Ok(SmsReceipt {
            provider: "inmemory".into(),
            message_id: Some(format!("sms_{}", sent.len())),
        })
    }
}
