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
use salon_notifier_api_structs::send_deferred_confirmation_sms::APIResponse;
use salon_notifier_domain::{deferred_confirmation_window, Appointment, SmsConfirmationType};
use salon_notifier_infra::NotifierContext;
use tracing::{error, info, warn};

fn handle_error(e: UseCaseErrors) -> NotifierError {
    match e {
        UseCaseErrors::StorageError => NotifierError::InternalError,
    }
}

pub async fn send_deferred_confirmation_sms_controller(
    http_req: HttpRequest,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_route(&http_req, &ctx)?;

    execute(SendDeferredConfirmationSmsUseCase {}, &ctx)
        .await
        .map(|report| HttpResponse::Ok().json(APIResponse::from(report)))
        .map_err(handle_error)
}

/// Sends the confirmation sms to clients who have not opened their
/// confirmation email 3 to 6 hours after it was sent.
#[derive(Debug)]
pub struct SendDeferredConfirmationSmsUseCase {}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

async fn notify(appointment: Appointment, ctx: &NotifierContext) -> SmsOutcome {
    // Short lead time bookings got their sms from the dispatcher
    if appointment.requires_immediate_confirmation_sms() {
        warn!(
            "Appointment: {} with a lead time of {} millis matched the deferred confirmation query, skipping it",
            appointment.id,
            appointment.lead_time_millis()
        );
        return SmsOutcome::Ineligible;
    }
    let appointment_id = appointment.id.clone();
    match NotificationContextBuilder::new(ctx).build_for(appointment).await {
        Ok(n) => {
            let kind = SmsKind::Confirmation(SmsConfirmationType::DeferredUnopened);
            claim_and_send_sms(kind, &n, ctx).await
        }
        Err(e) => {
            error!(
                "Unable to prepare the deferred sms of appointment: {}. Error: {}",
                appointment_id, e
            );
            SmsOutcome::Failed
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendDeferredConfirmationSmsUseCase {
    type Response = JobReport;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "SendDeferredConfirmationSms";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Errors> {
        let window = deferred_confirmation_window(ctx.sys.get_timestamp_millis());
        let candidates = ctx
            .repos
            .appointments
            .find_deferred_confirmation_candidates(&window)
            .await
            .map_err(|e| {
                error!("Unable to query deferred sms candidates. Error: {:?}", e);
                UseCaseErrors::StorageError
            })?;

        let report = run_batch(candidates, ctx.config.job_concurrency, |a| notify(a, ctx)).await;
        info!("Deferred confirmation sms job finished: {:?}", report);
        Ok(report)
    }
}
