use crate::{
    job::{
        send_deferred_confirmation_sms::SendDeferredConfirmationSmsUseCase,
        send_reminder_sms::SendReminderSmsUseCase,
    },
    shared::usecase::execute,
};
use actix_web::rt::time::{interval_at, Instant};
use salon_notifier_domain::HOUR_MILLIS;
use salon_notifier_infra::NotifierContext;
use std::time::Duration;
use tracing::info;

/// Millis from `now_ts` until the next multiple of `interval_millis`
pub fn get_start_delay(now_ts: i64, interval_millis: i64) -> i64 {
    let elapsed = now_ts.rem_euclid(interval_millis);
    if elapsed == 0 {
        0
    } else {
        interval_millis - elapsed
    }
}

/// First tick instant and period of a job running every `interval_millis`,
/// aligned to the wall clock
fn schedule(ctx: &NotifierContext, interval_millis: i64) -> (Instant, Duration) {
    let interval_millis = interval_millis.max(1000);
    let delay = get_start_delay(ctx.sys.get_timestamp_millis(), interval_millis);
    let start = Instant::now() + Duration::from_millis(delay as u64);
    (start, Duration::from_millis(interval_millis as u64))
}

pub fn start_deferred_confirmation_sms_job(ctx: NotifierContext) {
    actix_web::rt::spawn(async move {
        let (start, period) = schedule(&ctx, HOUR_MILLIS);
        info!("Deferred confirmation sms job scheduled every {:?}", period);
        let mut hourly_interval = interval_at(start, period);
        loop {
            hourly_interval.tick().await;
            let _ = execute(SendDeferredConfirmationSmsUseCase {}, &ctx).await;
        }
    });
}

pub fn start_reminder_sms_job(ctx: NotifierContext) {
    actix_web::rt::spawn(async move {
        let (start, period) = schedule(&ctx, ctx.config.reminder_window);
        info!("Reminder sms job scheduled every {:?}", period);
        let mut window_interval = interval_at(start, period);
        loop {
            window_interval.tick().await;
            let _ = execute(SendReminderSmsUseCase {}, &ctx).await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use salon_notifier_domain::MINUTE_MILLIS;

    #[test]
    fn start_delay_works() {
        assert_eq!(get_start_delay(50 * 1000, 60 * 1000), 10 * 1000);
        assert_eq!(get_start_delay(60 * 1000, 60 * 1000), 0);
        assert_eq!(get_start_delay(61 * 1000, 60 * 1000), 59 * 1000);
        assert_eq!(
            get_start_delay(HOUR_MILLIS + 5 * MINUTE_MILLIS, HOUR_MILLIS),
            55 * MINUTE_MILLIS
        );
        assert_eq!(
            get_start_delay(7 * MINUTE_MILLIS, 15 * MINUTE_MILLIS),
            8 * MINUTE_MILLIS
        );
    }
}
