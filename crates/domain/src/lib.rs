mod appointment;
mod client;
pub mod date;
pub mod email;
mod email_event;
mod notification;
mod salon;
mod salon_service;
mod shared;
pub mod sms;
mod stylist;

pub use appointment::{Appointment, AppointmentStatus, NotificationState, SmsConfirmationType};
pub use client::Client;
pub use email_event::{EmailEvent, EmailEventType};
pub use notification::{
    deferred_confirmation_window, reminder_window, NotificationContext, TimeWindow,
    DEFERRED_SMS_MAX_DELAY, DEFERRED_SMS_MIN_DELAY, HOUR_MILLIS, IMMEDIATE_SMS_LEAD_TIME,
    MINUTE_MILLIS, REMINDER_LEAD_TIME, REMINDER_WINDOW,
};
pub use salon::Salon;
pub use salon_service::SalonService;
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use stylist::Stylist;

pub use chrono_tz::Tz;
