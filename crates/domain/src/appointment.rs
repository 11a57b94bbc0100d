use crate::notification::IMMEDIATE_SMS_LEAD_TIME;
use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An `Appointment` is a booked service of a `Client` at a `Salon`.
///
/// The booking itself is owned by the booking application, this service
/// only reads it and drives its `NotificationState`.
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: ID,
    pub salon_id: ID,
    pub client_id: ID,
    pub service_id: ID,
    pub stylist_id: Option<ID>,
    /// When the service takes place
    pub start_ts: i64,
    pub end_ts: i64,
    /// When the booking was made
    pub created: i64,
    pub status: AppointmentStatus,
    pub notifications: NotificationState,
}

impl Appointment {
    pub fn new(
        salon_id: ID,
        client_id: ID,
        service_id: ID,
        start_ts: i64,
        end_ts: i64,
        created: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            salon_id,
            client_id,
            service_id,
            stylist_id: None,
            start_ts,
            end_ts,
            created,
            status: AppointmentStatus::Scheduled,
            notifications: Default::default(),
        }
    }

    /// Millis between the booking and the start of the appointment
    pub fn lead_time_millis(&self) -> i64 {
        self.start_ts - self.created
    }

    /// Bookings made less than 24 hours ahead get their confirmation sms
    /// right away as there is no time to wait for the email to be opened.
    pub fn requires_immediate_confirmation_sms(&self) -> bool {
        self.lead_time_millis() < IMMEDIATE_SMS_LEAD_TIME
    }

    pub fn is_notifiable(&self) -> bool {
        self.status.is_notifiable()
    }

    /// Nothing is left to send for this appointment
    pub fn notifications_settled(&self) -> bool {
        let n = &self.notifications;
        n.sms_confirmation_sent && (n.sms_reminder_sent || n.skip_reminder_sms)
    }
}

impl Entity for Appointment {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub const NOTIFIABLE: [AppointmentStatus; 2] =
        [AppointmentStatus::Scheduled, AppointmentStatus::Confirmed];

    pub fn is_notifiable(&self) -> bool {
        Self::NOTIFIABLE.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "no_show" => Ok(Self::NoShow),
            _ => Err(format!("Unknown appointment status: {}", s)),
        }
    }
}

/// Which rule caused the confirmation sms to be sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmsConfirmationType {
    /// Booked less than 24 hours ahead, sent together with the email.
    /// This sms also serves as the reminder.
    #[serde(rename = "immediate_lt24h")]
    ImmediateLt24h,
    /// The confirmation email was not opened in time
    #[serde(rename = "deferred_unopened")]
    DeferredUnopened,
}

impl SmsConfirmationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImmediateLt24h => "immediate_lt24h",
            Self::DeferredUnopened => "deferred_unopened",
        }
    }

    /// Whether this confirmation makes the 24h reminder redundant
    pub fn replaces_reminder(&self) -> bool {
        matches!(self, Self::ImmediateLt24h)
    }

    /// Whether this confirmation may only be claimed while the email is unopened
    pub fn requires_unopened_email(&self) -> bool {
        matches!(self, Self::DeferredUnopened)
    }
}

impl FromStr for SmsConfirmationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "immediate_lt24h" => Ok(Self::ImmediateLt24h),
            "deferred_unopened" => Ok(Self::DeferredUnopened),
            _ => Err(format!("Unknown sms confirmation type: {}", s)),
        }
    }
}

/// The notification flags of an `Appointment`.
///
/// Every flag only ever moves forward through conditional updates in the
/// repository, which is what keeps concurrent senders from sending twice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationState {
    pub email_sent_at: Option<i64>,
    pub email_opened_at: Option<i64>,
    pub sms_confirmation_sent: bool,
    pub sms_confirmation_type: Option<SmsConfirmationType>,
    pub sms_reminder_sent: bool,
    pub skip_reminder_sms: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HOUR_MILLIS;

    fn appointment(lead_time: i64) -> Appointment {
        let created = 1_700_000_000_000;
        Appointment::new(
            Default::default(),
            Default::default(),
            Default::default(),
            created + lead_time,
            created + lead_time + HOUR_MILLIS,
            created,
        )
    }

    #[test]
    fn immediate_sms_below_24h_lead_time() {
        assert!(appointment(10 * HOUR_MILLIS).requires_immediate_confirmation_sms());
        assert!(appointment(24 * HOUR_MILLIS - 1).requires_immediate_confirmation_sms());
        assert!(!appointment(24 * HOUR_MILLIS).requires_immediate_confirmation_sms());
        assert!(!appointment(48 * HOUR_MILLIS).requires_immediate_confirmation_sms());
    }

    #[test]
    fn only_scheduled_and_confirmed_are_notifiable() {
        let mut a = appointment(HOUR_MILLIS);
        assert!(a.is_notifiable());
        a.status = AppointmentStatus::Confirmed;
        assert!(a.is_notifiable());
        for status in [
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ] {
            a.status = status;
            assert!(!a.is_notifiable());
        }
    }

    #[test]
    fn settled_when_confirmation_sent_and_reminder_handled() {
        let mut a = appointment(48 * HOUR_MILLIS);
        assert!(!a.notifications_settled());
        a.notifications.sms_confirmation_sent = true;
        assert!(!a.notifications_settled());
        a.notifications.sms_reminder_sent = true;
        assert!(a.notifications_settled());

        let mut b = appointment(HOUR_MILLIS);
        b.notifications.sms_confirmation_sent = true;
        b.notifications.skip_reminder_sms = true;
        assert!(b.notifications_settled());
    }

    #[test]
    fn sms_confirmation_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&SmsConfirmationType::ImmediateLt24h).unwrap(),
            "\"immediate_lt24h\""
        );
        assert_eq!(
            "deferred_unopened".parse::<SmsConfirmationType>().unwrap(),
            SmsConfirmationType::DeferredUnopened
        );
        assert!(SmsConfirmationType::ImmediateLt24h.replaces_reminder());
        assert!(SmsConfirmationType::DeferredUnopened.requires_unopened_email());
        assert!(!SmsConfirmationType::ImmediateLt24h.requires_unopened_email());
        assert!(!SmsConfirmationType::DeferredUnopened.replaces_reminder());
        assert_eq!("no_show".parse::<AppointmentStatus>().unwrap(), AppointmentStatus::NoShow);
    }
}
