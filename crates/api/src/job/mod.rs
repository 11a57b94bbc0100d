pub mod send_deferred_confirmation_sms;
pub mod send_reminder_sms;

use crate::shared::sms_delivery::SmsOutcome;
use actix_web::web;
use futures::{stream, Future, StreamExt};
use salon_notifier_api_structs::dtos::JobReportDTO;
use send_deferred_confirmation_sms::send_deferred_confirmation_sms_controller;
use send_reminder_sms::send_reminder_sms_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/jobs/deferred-confirmation-sms",
        web::post().to(send_deferred_confirmation_sms_controller),
    );
    cfg.route(
        "/jobs/reminder-sms",
        web::post().to(send_reminder_sms_controller),
    );
}

/// Outcome of one job tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobReport {
    pub matched: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl JobReport {
    fn record(&mut self, outcome: SmsOutcome) {
        match outcome {
            SmsOutcome::Sent => self.sent += 1,
            SmsOutcome::AlreadyClaimed | SmsOutcome::NoPhone | SmsOutcome::Ineligible => {
                self.skipped += 1
            }
            SmsOutcome::Failed => self.failed += 1,
        }
    }
}

impl From<JobReport> for JobReportDTO {
    fn from(report: JobReport) -> Self {
        Self {
            matched: report.matched,
            sent: report.sent,
            skipped: report.skipped,
            failed: report.failed,
        }
    }
}

/// Notifies every candidate with at most `concurrency` in flight.
/// A failing candidate only shows up in the report.
async fn run_batch<T, F, Fut>(candidates: Vec<T>, concurrency: usize, notify: F) -> JobReport
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = SmsOutcome>,
{
    let mut report = JobReport {
        matched: candidates.len(),
        ..Default::default()
    };
    let outcomes = stream::iter(candidates)
        .map(notify)
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;
    for outcome in outcomes {
        report.record(outcome);
    }
    report
}
