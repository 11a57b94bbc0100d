use super::subscribers::AppendEmailEvent;
use crate::{
    error::NotifierError,
    shared::{
        auth::protect_webhook_route,
        usecase::{execute, Subscriber, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::DateTime;
use salon_notifier_api_structs::{
    dtos::EmailEventDataDTO,
    track_email_event::{APIResponse, RequestBody, TrackingOutcome},
};
use salon_notifier_domain::{Appointment, EmailEvent, EmailEventType, ID};
use salon_notifier_infra::NotifierContext;
use tracing::{info, warn};

/// Provider name stored on events received through the webhook
pub const WEBHOOK_PROVIDER: &str = "webhook";

const APPOINTMENT_ID_KEYS: [&str; 2] = ["appointment_id", "appointmentId"];

fn handle_error(e: UseCaseErrors) -> NotifierError {
    match e {
        UseCaseErrors::StorageError => NotifierError::InternalError,
    }
}

pub async fn track_email_event_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    protect_webhook_route(&http_req, &ctx)?;

    let usecase = TrackEmailEventUseCase {
        payload: body.0,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse {
            outcome: res.outcome,
        }))
        .map_err(handle_error)
}

/// Records delivery and open events of confirmation emails so that the
/// deferred confirmation sms is only sent to clients who did not open them.
#[derive(Debug)]
pub struct TrackEmailEventUseCase {
    pub payload: RequestBody,
}

#[derive(Debug)]
pub enum UseCaseErrors {
    StorageError,
}

#[derive(Debug)]
pub struct TrackedEmailEvent {
    pub outcome: TrackingOutcome,
    /// The event to append to the log, if any
    pub event: Option<EmailEvent>,
}

impl TrackedEmailEvent {
    fn ignored() -> Self {
        Self {
            outcome: TrackingOutcome::Ignored,
            event: None,
        }
    }
}

fn parse_event_type(event_type: &str) -> EmailEventType {
    match event_type {
        "email.sent" => EmailEventType::Sent,
        "email.delivered" => EmailEventType::Delivered,
        "email.opened" => EmailEventType::Opened,
        _ => EmailEventType::Other,
    }
}

/// The appointment id echoed back in the tags, or else in the metadata
fn tagged_appointment_id(data: &EmailEventDataDTO) -> Option<String> {
    let from_tags = data
        .tags
        .as_ref()
        .and_then(|tags| APPOINTMENT_ID_KEYS.iter().find_map(|key| tags.get(key)));
    if let Some(id) = from_tags {
        return Some(id.to_string());
    }

    let metadata = data.metadata.as_ref()?.as_object()?;
    APPOINTMENT_ID_KEYS
        .iter()
        .find_map(|key| metadata.get(*key))
        .and_then(|id| id.as_str())
        .map(|id| id.to_string())
}

impl TrackEmailEventUseCase {
    /// When the provider saw the event, falls back to the current time
    fn event_timestamp(&self, ctx: &NotifierContext) -> i64 {
        let now = ctx.sys.get_timestamp_millis();
        match &self.payload.created_at {
            Some(created_at) => match DateTime::parse_from_rfc3339(created_at) {
                Ok(ts) => ts.timestamp_millis(),
                Err(e) => {
                    warn!(
                        "Invalid created_at: {} on email event, using the current time. Error: {}",
                        created_at, e
                    );
                    now
                }
            },
            None => now,
        }
    }

    async fn correlate(&self, ctx: &NotifierContext) -> Result<Option<Appointment>, UseCaseErrors> {
        let data = &self.payload.data;

        if let Some(raw_id) = tagged_appointment_id(data) {
            let appointment_id = match raw_id.parse::<ID>() {
                Ok(id) => id,
                Err(e) => {
                    warn!("Email event tagged with an invalid appointment id. Error: {}", e);
                    return Ok(None);
                }
            };
            return Ok(ctx.repos.appointments.find(&appointment_id).await);
        }

        let recipient = match data.to.as_ref().and_then(|to| to.first()) {
            Some(recipient) => recipient,
            None => return Ok(None),
        };
        let clients = ctx
            .repos
            .clients
            .find_by_email(recipient)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;
        if clients.is_empty() {
            return Ok(None);
        }
        let client_ids = clients.into_iter().map(|c| c.id).collect::<Vec<_>>();
        Ok(ctx
            .repos
            .appointments
            .find_latest_by_clients(&client_ids)
            .await)
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for TrackEmailEventUseCase {
    type Response = TrackedEmailEvent;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "TrackEmailEvent";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Errors> {
        let event_type = parse_event_type(&self.payload.event_type);

        let appointment = match self.correlate(ctx).await? {
            Some(appointment) => appointment,
            None => {
                info!(
                    "Ignoring {} email event: {:?} that matches no appointment",
                    self.payload.event_type, self.payload.data.email_id
                );
                return Ok(TrackedEmailEvent::ignored());
            }
        };

        let now = ctx.sys.get_timestamp_millis();
        let outcome = if event_type.marks_opened() {
            let opened = ctx
                .repos
                .appointments
                .mark_email_opened(&appointment.id, now)
                .await
                .map_err(|_| UseCaseErrors::StorageError)?;
            if !opened {
                return Ok(TrackedEmailEvent {
                    outcome: TrackingOutcome::AlreadyOpened,
                    event: None,
                });
            }
            info!("Confirmation email of appointment: {} opened", appointment.id);
            TrackingOutcome::Opened
        } else {
            TrackingOutcome::Recorded
        };

        let timestamp = self.event_timestamp(ctx);
        let mut event = EmailEvent::new(appointment.id, event_type, WEBHOOK_PROVIDER, timestamp);
        event.provider_event_id = self.payload.data.email_id.clone();
        event.metadata = serde_json::to_value(&self.payload.data).unwrap_or_default();

        Ok(TrackedEmailEvent {
            outcome,
            event: Some(event),
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(AppendEmailEvent)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::DispatchConfirmationUseCase;
    use crate::job::send_deferred_confirmation_sms::SendDeferredConfirmationSmsUseCase;
    use crate::shared::test_helpers::{setup, TestEnv};
    use salon_notifier_domain::{HOUR_MILLIS, MINUTE_MILLIS};
    use serde_json::json;

    fn payload(value: serde_json::Value) -> TrackEmailEventUseCase {
        TrackEmailEventUseCase {
            payload: serde_json::from_value(value).unwrap(),
        }
    }

    async fn track(env: &TestEnv, value: serde_json::Value) -> TrackedEmailEvent {
        execute(payload(value), &env.ctx).await.unwrap()
    }

    async fn logged(env: &TestEnv, appointment: &Appointment) -> Vec<EmailEvent> {
        env.ctx
            .repos
            .email_events
            .find_by_appointment(&appointment.id)
            .await
            .unwrap()
    }

    #[test]
    fn maps_provider_event_types() {
        assert_eq!(parse_event_type("email.opened"), EmailEventType::Opened);
        assert_eq!(parse_event_type("email.delivered"), EmailEventType::Delivered);
        assert_eq!(parse_event_type("email.sent"), EmailEventType::Sent);
        assert_eq!(parse_event_type("email.bounced"), EmailEventType::Other);
    }

    #[test]
    fn reads_the_appointment_id_from_tags_before_metadata() {
        let body: RequestBody = serde_json::from_value(json!({
            "type": "email.opened",
            "data": {
                "tags": { "appointmentId": "from-tags" },
                "metadata": { "appointment_id": "from-metadata" }
            }
        }))
        .unwrap();
        assert_eq!(tagged_appointment_id(&body.data).as_deref(), Some("from-tags"));

        let body: RequestBody = serde_json::from_value(json!({
            "type": "email.opened",
            "data": { "metadata": { "appointmentId": "from-metadata" } }
        }))
        .unwrap();
        assert_eq!(tagged_appointment_id(&body.data).as_deref(), Some("from-metadata"));
    }

    #[actix_web::main]
    #[test]
    async fn open_event_marks_the_email_once() {
        let env = setup().await;
        let appointment = env.book(72 * HOUR_MILLIS).await;
        let event = json!({
            "type": "email.opened",
            "created_at": "2025-03-10T09:30:00Z",
            "data": {
                "email_id": "em_1",
                "tags": [{ "name": "appointment_id", "value": appointment.id.to_string() }]
            }
        });

        let res = track(&env, event.clone()).await;
        assert_eq!(res.outcome, TrackingOutcome::Opened);
        let opened_at = env.now();
        assert_eq!(
            env.find(&appointment).await.notifications.email_opened_at,
            Some(opened_at)
        );

        env.sys.advance(HOUR_MILLIS);
        let res = track(&env, event).await;
        assert_eq!(res.outcome, TrackingOutcome::AlreadyOpened);
        assert_eq!(
            env.find(&appointment).await.notifications.email_opened_at,
            Some(opened_at)
        );

        let events = logged(&env, &appointment).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EmailEventType::Opened);
        // The log keeps the time the provider saw the open
        assert_eq!(events[0].timestamp, opened_at + 30 * MINUTE_MILLIS);
        assert_eq!(events[0].provider_event_id.as_deref(), Some("em_1"));
    }

    #[actix_web::main]
    #[test]
    async fn delivered_event_counts_as_opened() {
        let env = setup().await;
        let appointment = env.book(72 * HOUR_MILLIS).await;

        let res = track(
            &env,
            json!({
                "type": "email.delivered",
                "data": { "metadata": { "appointmentId": appointment.id.to_string() } }
            }),
        )
        .await;
        assert_eq!(res.outcome, TrackingOutcome::Opened);
        assert_eq!(
            env.find(&appointment).await.notifications.email_opened_at,
            Some(env.now())
        );
    }

    #[actix_web::main]
    #[test]
    async fn other_events_are_only_logged() {
        let env = setup().await;
        let appointment = env.book(72 * HOUR_MILLIS).await;
        let event = json!({
            "type": "email.bounced",
            "data": {
                "email_id": "em_2",
                "tags": { "appointment_id": appointment.id.to_string() }
            }
        });

        assert_eq!(track(&env, event.clone()).await.outcome, TrackingOutcome::Recorded);
        // Redelivered by the provider
        assert_eq!(track(&env, event).await.outcome, TrackingOutcome::Recorded);

        assert!(env.find(&appointment).await.notifications.email_opened_at.is_none());
        let events = logged(&env, &appointment).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EmailEventType::Other);
        assert_eq!(events[0].provider, WEBHOOK_PROVIDER);
    }

    #[actix_web::main]
    #[test]
    async fn unknown_appointment_is_ignored() {
        let env = setup().await;
        let appointment = env.book(72 * HOUR_MILLIS).await;

        for id in [ID::default().to_string(), "not-an-id".to_string()] {
            let res = track(
                &env,
                json!({
                    "type": "email.opened",
                    "data": {
                        "to": ["colette@example.com"],
                        "tags": { "appointment_id": id }
                    }
                }),
            )
            .await;
            assert_eq!(res.outcome, TrackingOutcome::Ignored);
        }

        assert!(env.find(&appointment).await.notifications.email_opened_at.is_none());
        assert!(logged(&env, &appointment).await.is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn falls_back_to_the_latest_appointment_of_the_recipient() {
        let env = setup().await;
        let older = env.book(72 * HOUR_MILLIS).await;
        env.sys.advance(HOUR_MILLIS);
        let latest = env.book(48 * HOUR_MILLIS).await;

        let res = track(
            &env,
            json!({ "type": "email.opened", "data": { "to": "Colette@Example.com" } }),
        )
        .await;
        assert_eq!(res.outcome, TrackingOutcome::Opened);
        assert!(env.find(&latest).await.notifications.email_opened_at.is_some());
        assert!(env.find(&older).await.notifications.email_opened_at.is_none());

        let res = track(
            &env,
            json!({ "type": "email.opened", "data": { "to": ["nobody@example.com"] } }),
        )
        .await;
        assert_eq!(res.outcome, TrackingOutcome::Ignored);
    }

    #[actix_web::main]
    #[test]
    async fn opened_email_prevents_the_deferred_sms() {
        let env = setup().await;
        let appointment = env.book(72 * HOUR_MILLIS).await;
        let usecase = DispatchConfirmationUseCase {
            appointment_id: appointment.id.clone(),
        };
        execute(usecase, &env.ctx).await.unwrap();

        env.sys.advance(HOUR_MILLIS);
        let res = track(
            &env,
            json!({
                "type": "email.opened",
                "data": { "tags": { "appointment_id": appointment.id.to_string() } }
            }),
        )
        .await;
        assert_eq!(res.outcome, TrackingOutcome::Opened);

        env.sys.advance(3 * HOUR_MILLIS);
        let report = execute(SendDeferredConfirmationSmsUseCase {}, &env.ctx)
            .await
            .unwrap();
        assert_eq!(report.matched, 0);
        assert!(env.sms.sent().is_empty());
    }
}
