use super::subscribers::AppendSentEmailEvent;
use crate::{
    error::NotifierError,
    shared::{
        auth::protect_route,
        guard::Guard,
        notification_context::{ContextError, NotificationContextBuilder},
        sms_delivery::{claim_and_send_sms, SmsKind, SmsOutcome},
        usecase::{execute, Subscriber, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use salon_notifier_api_structs::dispatch_confirmation::APIResponse;
use salon_notifier_domain::{
    email::build_confirmation_email, NotificationContext, SmsConfirmationType, ID, MINUTE_MILLIS,
};
use salon_notifier_infra::{EmailMessage, EmailReceipt, EmailTag, NotifierContext};
use std::collections::HashMap;
use tracing::{error, info, warn};

/// Tag and metadata key the email provider echoes back in its webhooks
pub const APPOINTMENT_ID_TAG: &str = "appointment_id";

fn handle_error(e: UseCaseErrors) -> NotifierError {
    match e {
        UseCaseErrors::NotFound(appointment_id) => NotifierError::NotFound(format!(
            "The appointment with id: {}, was not found.",
            appointment_id
        )),
        UseCaseErrors::IncompleteAppointment(e) => NotifierError::NotFound(e.to_string()),
    }
}

pub async fn dispatch_confirmation_controller(
    http_req: HttpRequest,
    path_params: web::Path<String>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_route(&http_req, &ctx)?;
    let appointment_id = Guard::against_malformed_id(&path_params)?;

    let usecase = DispatchConfirmationUseCase { appointment_id };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse {
                appointment_id: res.appointment_id,
                email_sent: res.email.is_some(),
                sms_sent: res.sms_sent,
                skipped: res.skipped,
                lead_time_minutes: res.lead_time / MINUTE_MILLIS,
            })
        })
        .map_err(handle_error)
}

/// Sends the confirmation email of a freshly booked appointment, plus the
/// confirmation sms right away when it starts within 24 hours.
#[derive(Debug)]
pub struct DispatchConfirmationUseCase {
    pub appointment_id: ID,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    NotFound(ID),
    IncompleteAppointment(ContextError),
}

#[derive(Debug)]
pub struct SentEmail {
    pub receipt: EmailReceipt,
    pub sent_at: i64,
}

#[derive(Debug)]
pub struct DispatchedConfirmation {
    pub appointment_id: ID,
    /// Set when the confirmation email was accepted by the provider during this call
    pub email: Option<SentEmail>,
    pub sms_sent: bool,
    pub skipped: bool,
    pub lead_time: i64,
}

async fn send_confirmation_email(
    n: &NotificationContext,
    ctx: &NotifierContext,
) -> Option<SentEmail> {
    let appointment_id = &n.appointment.id;
    if n.appointment.notifications.email_sent_at.is_some() {
        info!(
            "Confirmation email of appointment: {} was already sent",
            appointment_id
        );
        return None;
    }
    let to = match &n.client.email {
        Some(email) => email.clone(),
        None => {
            warn!(
                "Client: {} of appointment: {} has no email address",
                n.client.id, appointment_id
            );
            return None;
        }
    };

    let content = build_confirmation_email(n);
    let message = EmailMessage {
        to,
        subject: content.subject,
        html: content.html,
        text: Some(content.text),
        tags: vec![EmailTag::new(APPOINTMENT_ID_TAG, &appointment_id.to_string())],
        metadata: HashMap::from([(APPOINTMENT_ID_TAG.to_string(), appointment_id.to_string())]),
    };

    let receipt = match ctx.senders.email.send(&message).await {
        Ok(receipt) => receipt,
        Err(e) => {
            error!(
                "Unable to send the confirmation email of appointment: {}. Error: {}",
                appointment_id, e
            );
            return None;
        }
    };

    let sent_at = ctx.sys.get_timestamp_millis();
    if let Err(e) = ctx
        .repos
        .appointments
        .mark_email_sent(appointment_id, sent_at)
        .await
    {
        error!(
            "Confirmation email of appointment: {} was sent but could not be stored. Error: {:?}",
            appointment_id, e
        );
    }
    Some(SentEmail { receipt, sent_at })
}

#[async_trait::async_trait(?Send)]
impl UseCase for DispatchConfirmationUseCase {
    type Response = DispatchedConfirmation;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "DispatchConfirmation";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Errors> {
        let appointment = ctx
            .repos
            .appointments
            .find(&self.appointment_id)
            .await
            .ok_or_else(|| UseCaseErrors::NotFound(self.appointment_id.clone()))?;
        let lead_time = appointment.lead_time_millis();
        let mut res = DispatchedConfirmation {
            appointment_id: appointment.id.clone(),
            email: None,
            sms_sent: false,
            skipped: false,
            lead_time,
        };

        if !appointment.is_notifiable() {
            info!(
                "Appointment: {} has status: {:?}, no confirmation is sent",
                appointment.id, appointment.status
            );
            res.skipped = true;
            return Ok(res);
        }

        let immediate_sms = appointment.requires_immediate_confirmation_sms();
        let n = NotificationContextBuilder::new(ctx)
            .build_for(appointment)
            .await
            .map_err(UseCaseErrors::IncompleteAppointment)?;

        res.email = send_confirmation_email(&n, ctx).await;

        if immediate_sms {
            let kind = SmsKind::Confirmation(SmsConfirmationType::ImmediateLt24h);
            res.sms_sent = claim_and_send_sms(kind, &n, ctx).await == SmsOutcome::Sent;
        } else if let Err(e) = ctx
            .repos
            .appointments
            .enable_reminder_sms(&n.appointment.id)
            .await
        {
            error!(
                "Unable to enable the reminder sms of appointment: {}. Error: {:?}",
                n.appointment.id, e
            );
        }

        Ok(res)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(AppendSentEmailEvent)]
    }
}
