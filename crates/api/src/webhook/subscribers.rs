use super::track_email_event::{TrackEmailEventUseCase, TrackedEmailEvent};
use crate::shared::usecase::Subscriber;
use salon_notifier_infra::NotifierContext;
use tracing::{error, info};

/// Appends the correlated webhook event to the email event log.
/// Redelivered webhooks carry the same provider event id and are only logged once.
pub struct AppendEmailEvent;

#[async_trait::async_trait(?Send)]
impl Subscriber<TrackEmailEventUseCase> for AppendEmailEvent {
    async fn notify(&self, e: &TrackedEmailEvent, ctx: &NotifierContext) {
        let event = match &e.event {
            Some(event) => event,
            None => return,
        };

        if event.provider_event_id.is_some() {
            let logged = match ctx
                .repos
                .email_events
                .find_by_appointment(&event.appointment_id)
                .await
            {
                Ok(logged) => logged,
                Err(err) => {
                    error!(
                        "Unable to read the email events of appointment: {}. Error: {:?}",
                        event.appointment_id, err
                    );
                    return;
                }
            };
            let duplicate = logged.iter().any(|l| {
                l.event_type == event.event_type && l.provider_event_id == event.provider_event_id
            });
            if duplicate {
                info!(
                    "Email event: {:?} of appointment: {} is already logged",
                    event.provider_event_id, event.appointment_id
                );
                return;
            }
        }

        if let Err(err) = ctx.repos.email_events.insert(event).await {
            error!(
                "Unable to log the {} email event of appointment: {}. Error: {:?}",
                event.event_type.as_str(),
                event.appointment_id,
                err
            );
        }
    }
}
