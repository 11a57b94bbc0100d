use super::{run_batch, JobReport};
use crate::{
    error::NotifierError,
    shared::{
        auth::protect_route,
        notification_context::NotificationContextBuilder,
        sms_delivery::{claim_and_send_sms, SmsKind, SmsOutcome},
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use salon_notifier_api_structs::send_reminder_sms::APIResponse;
use salon_notifier_domain::{reminder_window, Appointment};
use salon_notifier_infra::NotifierContext;
use tracing::{error, info};

fn handle_error(e: UseCaseErrors) -> NotifierError {
    match e {
        UseCaseErrors::StorageError => NotifierError::InternalError,
    }
}

pub async fn send_reminder_sms_controller(
    http_req: HttpRequest,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_route(&http_req, &ctx)?;

    execute(SendReminderSmsUseCase {}, &ctx)
        .await
        .map(|report| HttpResponse::Ok().json(APIResponse::from(report)))
        .map_err(handle_error)
}

/// Sends the reminder sms to appointments starting in 24 hours, unless an
/// immediate confirmation sms already replaced it.
#[derive(Debug)]
pub struct SendReminderSmsUseCase {}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

async fn notify(appointment: Appointment, ctx: &NotifierContext) -> SmsOutcome {
    let appointment_id = appointment.id.clone();
    match NotificationContextBuilder::new(ctx).build_for(appointment).await {
        Ok(n) => claim_and_send_sms(SmsKind::Reminder, &n, ctx).await,
        Err(e) => {
            error!(
                "Unable to prepare the reminder sms of appointment: {}. Error: {}",
                appointment_id, e
            );
            SmsOutcome::Failed
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendReminderSmsUseCase {
    type Response = JobReport;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "SendReminderSms";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Errors> {
        let window = reminder_window(ctx.sys.get_timestamp_millis(), ctx.config.reminder_window);
        let candidates = ctx
            .repos
            .appointments
            .find_reminder_candidates(&window)
            .await
            .map_err(|e| {
                error!("Unable to query reminder sms candidates. Error: {:?}", e);
                UseCaseErrors::StorageError
            })?;

        let report = run_batch(candidates, ctx.config.job_concurrency, |a| notify(a, ctx)).await;
        info!("Reminder sms job finished: {:?}", report);
        Ok(report)
    }
}
