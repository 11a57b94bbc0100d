use crate::{date, Appointment, Client, Salon, SalonService, Stylist};
use chrono::DateTime;
use chrono_tz::Tz;

pub const MINUTE_MILLIS: i64 = 60 * 1000;
pub const HOUR_MILLIS: i64 = 60 * MINUTE_MILLIS;

/// Bookings with a shorter lead time get their confirmation sms immediately
pub const IMMEDIATE_SMS_LEAD_TIME: i64 = 24 * HOUR_MILLIS;
/// An unopened confirmation email is followed up by sms once it is older
/// than `DEFERRED_SMS_MIN_DELAY` but not older than `DEFERRED_SMS_MAX_DELAY`
pub const DEFERRED_SMS_MIN_DELAY: i64 = 3 * HOUR_MILLIS;
pub const DEFERRED_SMS_MAX_DELAY: i64 = 6 * HOUR_MILLIS;
/// How long before the appointment the reminder sms goes out
pub const REMINDER_LEAD_TIME: i64 = 24 * HOUR_MILLIS;
/// Default width of the reminder window. The reminder job must not tick
/// less often than this or appointments fall between two windows.
pub const REMINDER_WINDOW: i64 = 15 * MINUTE_MILLIS;

/// A span of time that is open at `start` and closed at `end`, i.e. `(start, end]`.
///
/// Consecutive windows produced by a job ticking every `end - start` millis
/// therefore tile the timeline without overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    pub fn contains(&self, ts: i64) -> bool {
        self.start < ts && ts <= self.end
    }
}

/// Window of `email_sent_at` values the deferred confirmation job looks at.
///
/// The lower bound keeps old appointments from being reprocessed after the
/// job has been down, at the cost of never sending them a deferred sms.
pub fn deferred_confirmation_window(now: i64) -> TimeWindow {
    TimeWindow {
        start: now - DEFERRED_SMS_MAX_DELAY,
        end: now - DEFERRED_SMS_MIN_DELAY,
    }
}

/// Window of appointment start times the reminder job looks at
pub fn reminder_window(now: i64, window: i64) -> TimeWindow {
    TimeWindow {
        start: now + REMINDER_LEAD_TIME,
        end: now + REMINDER_LEAD_TIME + window,
    }
}

/// Everything needed to render a notification for one `Appointment`
#[derive(Debug, Clone)]
pub struct NotificationContext {
    pub appointment: Appointment,
    pub client: Client,
    pub service: SalonService,
    pub stylist: Option<Stylist>,
    pub salon: Salon,
}

impl NotificationContext {
    /// Start of the appointment in the salon's timezone
    pub fn local_start(&self) -> Option<DateTime<Tz>> {
        date::to_local(self.appointment.start_ts, &self.salon.timezone)
    }

    pub fn local_end(&self) -> Option<DateTime<Tz>> {
        date::to_local(self.appointment.end_ts, &self.salon.timezone)
    }
}
