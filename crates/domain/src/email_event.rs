use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An entry in the append only log of email activity for an `Appointment`.
///
/// Only used for auditing, decisions are made on the `NotificationState`.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailEvent {
    pub id: ID,
    pub appointment_id: ID,
    pub event_type: EmailEventType,
    pub provider: String,
    pub provider_event_id: Option<String>,
    pub timestamp: i64,
    pub metadata: serde_json::Value,
}

impl EmailEvent {
    pub fn new(
        appointment_id: ID,
        event_type: EmailEventType,
        provider: &str,
        timestamp: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            appointment_id,
            event_type,
            provider: provider.into(),
            provider_event_id: None,
            timestamp,
            metadata: serde_json::Value::Null,
        }
    }
}

impl Entity for EmailEvent {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailEventType {
    Sent,
    Delivered,
    Opened,
    Other,
}

impl EmailEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Opened => "opened",
            Self::Other => "other",
        }
    }

    /// Event types that prove the client has seen the confirmation
    pub fn marks_opened(&self) -> bool {
        matches!(self, Self::Opened | Self::Delivered)
    }
}

impl FromStr for EmailEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(Self::Sent),
            "delivered" => Ok(Self::Delivered),
            "opened" => Ok(Self::Opened),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown email event type: {}", s)),
        }
    }
}
