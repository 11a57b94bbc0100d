use crate::dtos::EmailEventDataDTO;
use serde::{Deserialize, Serialize};

pub mod track_email_event {
    use super::*;

    /// Webhook payload of the email provider, e.g. `{ "type": "email.opened", "data": { .. } }`
    #[derive(Debug, Clone, Deserialize, Serialize)]
    pub struct RequestBody {
        #[serde(rename = "type")]
        pub event_type: String,
        /// RFC 3339 timestamp of the event
        #[serde(default)]
        pub created_at: Option<String>,
        #[serde(default)]
        pub data: EmailEventDataDTO,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TrackingOutcome {
        /// `email_opened_at` was set by this event
        Opened,
        /// `email_opened_at` was already set, nothing changed
        AlreadyOpened,
        /// Appended to the event log without touching the notification flags
        Recorded,
        /// No appointment could be correlated with the event
        Ignored,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub outcome: TrackingOutcome,
    }
}

#[cfg(test)]
mod tests {
    use super::track_email_event::RequestBody;

    #[test]
    fn parses_tags_in_both_shapes() {
        let listed: RequestBody = serde_json::from_str(
            r#"{
                "type": "email.opened",
                "created_at": "2025-03-14T10:00:00Z",
                "data": {
                    "email_id": "em_1",
                    "to": ["colette@example.com"],
                    "tags": [{ "name": "appointment_id", "value": "abc" }],
                    "subject": "Confirmation"
                }
            }"#,
        )
        .unwrap();
        let data = listed.data;
        assert_eq!(data.tags.unwrap().get("appointment_id"), Some("abc"));
        assert_eq!(data.to.unwrap().first(), Some("colette@example.com"));
        assert!(data.extra.contains_key("subject"));

        let mapped: RequestBody = serde_json::from_str(
            r#"{ "type": "email.delivered", "data": { "to": "a@b.c", "tags": { "appointmentId": "xyz" } } }"#,
        )
        .unwrap();
        assert_eq!(mapped.data.tags.unwrap().get("appointmentId"), Some("xyz"));
        assert_eq!(mapped.created_at, None);
    }

    #[test]
    fn data_is_optional() {
        let body: RequestBody = serde_json::from_str(r#"{ "type": "email.bounced" }"#).unwrap();
        assert_eq!(body.data.to, None);
    }
}
