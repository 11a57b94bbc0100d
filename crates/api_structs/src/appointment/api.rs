use salon_notifier_domain::ID;
use serde::{Deserialize, Serialize};

pub mod dispatch_confirmation {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub appointment_id: ID,
        pub email_sent: bool,
        pub sms_sent: bool,
        /// Set when the appointment is no longer eligible for notifications
        pub skipped: bool,
        pub lead_time_minutes: i64,
    }
}
