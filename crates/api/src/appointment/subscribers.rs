use super::dispatch_confirmation::{DispatchConfirmationUseCase, DispatchedConfirmation};
use crate::shared::usecase::Subscriber;
use salon_notifier_domain::{EmailEvent, EmailEventType};
use salon_notifier_infra::NotifierContext;
use tracing::error;

pub struct AppendSentEmailEvent;

#[async_trait::async_trait(?Send)]
impl Subscriber<DispatchConfirmationUseCase> for AppendSentEmailEvent {
    async fn notify(&self, e: &DispatchedConfirmation, ctx: &NotifierContext) {
        let sent = match &e.email {
            Some(sent) => sent,
            None => return,
        };
        let mut event = EmailEvent::new(
            e.appointment_id.clone(),
            EmailEventType::Sent,
            &sent.receipt.provider,
            sent.sent_at,
        );
        event.provider_event_id = sent.receipt.message_id.clone();

        if let Err(err) = ctx.repos.email_events.insert(&event).await {
            error!(
                "Unable to log the sent email of appointment: {}. Error: {:?}",
                e.appointment_id, err
            );
        }
    }
}
