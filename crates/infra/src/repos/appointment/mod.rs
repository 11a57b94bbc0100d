mod inmemory;
mod postgres;

pub use inmemory::InMemoryAppointmentRepo;
pub use postgres::PostgresAppointmentRepo;
use salon_notifier_domain::{Appointment, SmsConfirmationType, TimeWindow, ID};

/// Storage of `Appointment`s and their notification flags.
///
/// All `mark_*`, `claim_*`, `release_*` and `enable_*` methods are conditional
/// updates that check and write in one step. They return `true` only for the
/// caller whose update matched, so among concurrent callers at most one wins.
#[async_trait::async_trait]
pub trait IAppointmentRepo: Send + Sync {
    async fn insert(&self, appointment: &Appointment) -> anyhow::Result<()>;
    async fn find(&self, appointment_id: &ID) -> Option<Appointment>;
    /// The most recently booked appointment of any of the given clients
    async fn find_latest_by_clients(&self, client_ids: &[ID]) -> Option<Appointment>;
    /// Sets `email_sent_at` if it is not set yet
    async fn mark_email_sent(&self, appointment_id: &ID, sent_at: i64) -> anyhow::Result<bool>;
    /// Sets `email_opened_at` if it is not set yet
    async fn mark_email_opened(&self, appointment_id: &ID, opened_at: i64)
        -> anyhow::Result<bool>;
    /// Flips `sms_confirmation_sent` from false to true for a notifiable appointment.
    /// An `ImmediateLt24h` confirmation also sets `skip_reminder_sms`, a `DeferredUnopened`
    /// one only succeeds while `email_opened_at` is not set.
    async fn claim_sms_confirmation(
        &self,
        appointment_id: &ID,
        confirmation_type: SmsConfirmationType,
    ) -> anyhow::Result<bool>;
    /// Undoes a claim whose sms could not be sent
    async fn release_sms_confirmation(
        &self,
        appointment_id: &ID,
        confirmation_type: SmsConfirmationType,
    ) -> anyhow::Result<bool>;
    /// Clears `skip_reminder_sms` unless an immediate confirmation replaced the reminder
    async fn enable_reminder_sms(&self, appointment_id: &ID) -> anyhow::Result<bool>;
    /// Flips `sms_reminder_sent` from false to true when the reminder is not skipped
    async fn claim_sms_reminder(&self, appointment_id: &ID) -> anyhow::Result<bool>;
    async fn release_sms_reminder(&self, appointment_id: &ID) -> anyhow::Result<bool>;
    /// Notifiable appointments whose email was sent inside `email_sent`, never
    /// opened, and that have not received a confirmation sms
    async fn find_deferred_confirmation_candidates(
        &self,
        email_sent: &TimeWindow,
    ) -> anyhow::Result<Vec<Appointment>>;
    /// Notifiable appointments starting inside `start` that still owe a reminder
    async fn find_reminder_candidates(&self, start: &TimeWindow)
        -> anyhow::Result<Vec<Appointment>>;
}

#[cfg(test)]
mod tests {
    use crate::repos::tests::{create_contexts, insert_directory};
    use crate::NotifierContext;
    use salon_notifier_domain::{
        deferred_confirmation_window, reminder_window, Appointment, AppointmentStatus,
        SmsConfirmationType, HOUR_MILLIS, REMINDER_WINDOW,
    };

    const NOW: i64 = 1_740_000_000_000;

    async fn insert_appointment(ctx: &NotifierContext, lead_time: i64) -> Appointment {
        let (salon, client, service) = insert_directory(ctx).await;
        let appointment = Appointment::new(
            salon.id,
            client.id,
            service.id,
            NOW + lead_time,
            NOW + lead_time + HOUR_MILLIS,
            NOW,
        );
        ctx.repos.appointments.insert(&appointment).await.unwrap();
        appointment
    }

    #[tokio::test]
    async fn insert_and_find() {
        for ctx in create_contexts().await {
            let appointment = insert_appointment(&ctx, 48 * HOUR_MILLIS).await;
            let res = ctx.repos.appointments.find(&appointment.id).await.unwrap();
            assert_eq!(res, appointment);

            let latest = ctx
                .repos
                .appointments
                .find_latest_by_clients(&[appointment.client_id.clone()])
                .await
                .unwrap();
            assert_eq!(latest.id, appointment.id);
            assert!(ctx.repos.appointments.find(&Default::default()).await.is_none());
        }
    }

    #[tokio::test]
    async fn email_flags_are_set_once() {
        for ctx in create_contexts().await {
            let repo = &ctx.repos.appointments;
            let appointment = insert_appointment(&ctx, 48 * HOUR_MILLIS).await;

            assert!(repo.mark_email_sent(&appointment.id, NOW).await.unwrap());
            assert!(!repo.mark_email_sent(&appointment.id, NOW + 1).await.unwrap());
            assert!(repo.mark_email_opened(&appointment.id, NOW + 5).await.unwrap());
            assert!(!repo.mark_email_opened(&appointment.id, NOW + 9).await.unwrap());

            let n = repo.find(&appointment.id).await.unwrap().notifications;
            assert_eq!(n.email_sent_at, Some(NOW));
            assert_eq!(n.email_opened_at, Some(NOW + 5));
        }
    }

    #[tokio::test]
    async fn immediate_confirmation_claim_skips_reminder() {
        for ctx in create_contexts().await {
            let repo = &ctx.repos.appointments;
            let appointment = insert_appointment(&ctx, 10 * HOUR_MILLIS).await;
            let immediate = SmsConfirmationType::ImmediateLt24h;

            assert!(repo.claim_sms_confirmation(&appointment.id, immediate).await.unwrap());
            assert!(!repo.claim_sms_confirmation(&appointment.id, immediate).await.unwrap());
            assert!(!repo
                .claim_sms_confirmation(&appointment.id, SmsConfirmationType::DeferredUnopened)
                .await
                .unwrap());

            let n = repo.find(&appointment.id).await.unwrap().notifications;
            assert!(n.sms_confirmation_sent);
            assert_eq!(n.sms_confirmation_type, Some(immediate));
            assert!(n.skip_reminder_sms);

            // The reminder can neither be enabled nor claimed any more
            assert!(!repo.enable_reminder_sms(&appointment.id).await.unwrap());
            assert!(!repo.claim_sms_reminder(&appointment.id).await.unwrap());

            // A release puts everything back
            assert!(repo.release_sms_confirmation(&appointment.id, immediate).await.unwrap());
            let n = repo.find(&appointment.id).await.unwrap().notifications;
            assert!(!n.sms_confirmation_sent);
            assert_eq!(n.sms_confirmation_type, None);
            assert!(!n.skip_reminder_sms);
        }
    }

    #[tokio::test]
    async fn deferred_confirmation_claim_keeps_reminder() {
        for ctx in create_contexts().await {
            let repo = &ctx.repos.appointments;
            let appointment = insert_appointment(&ctx, 48 * HOUR_MILLIS).await;
            let deferred = SmsConfirmationType::DeferredUnopened;

            assert!(repo.enable_reminder_sms(&appointment.id).await.unwrap());
            assert!(repo.claim_sms_confirmation(&appointment.id, deferred).await.unwrap());
            // Releasing with the wrong type does nothing
            assert!(!repo
                .release_sms_confirmation(&appointment.id, SmsConfirmationType::ImmediateLt24h)
                .await
                .unwrap());

            let n = repo.find(&appointment.id).await.unwrap().notifications;
            assert_eq!(n.sms_confirmation_type, Some(deferred));
            assert!(!n.skip_reminder_sms);

            assert!(repo.claim_sms_reminder(&appointment.id).await.unwrap());
            assert!(!repo.claim_sms_reminder(&appointment.id).await.unwrap());
            assert!(repo.release_sms_reminder(&appointment.id).await.unwrap());
            assert!(!repo.release_sms_reminder(&appointment.id).await.unwrap());
            assert!(repo.claim_sms_reminder(&appointment.id).await.unwrap());
        }
    }

    #[tokio::test]
    async fn deferred_confirmation_claim_requires_unopened_email() {
        for ctx in create_contexts().await {
            let repo = &ctx.repos.appointments;
            let appointment = insert_appointment(&ctx, 48 * HOUR_MILLIS).await;
            assert!(repo.mark_email_opened(&appointment.id, NOW).await.unwrap());

            assert!(!repo
                .claim_sms_confirmation(&appointment.id, SmsConfirmationType::DeferredUnopened)
                .await
                .unwrap());
            assert!(!repo.find(&appointment.id).await.unwrap().notifications.sms_confirmation_sent);

            // An opened email does not block the immediate confirmation
            assert!(repo
                .claim_sms_confirmation(&appointment.id, SmsConfirmationType::ImmediateLt24h)
                .await
                .unwrap());
        }
    }

    #[tokio::test]
    async fn concurrent_claims_have_a_single_winner() {
        for ctx in create_contexts().await {
            let appointment = insert_appointment(&ctx, 10 * HOUR_MILLIS).await;
            let claims = (0..8).map(|_| {
                ctx.repos
                    .appointments
                    .claim_sms_confirmation(&appointment.id, SmsConfirmationType::ImmediateLt24h)
            });
            let winners = futures::future::join_all(claims)
                .await
                .into_iter()
                .filter(|res| matches!(res, Ok(true)))
                .count();
            assert_eq!(winners, 1);
        }
    }

    #[tokio::test]
    async fn cancelled_appointments_cannot_be_claimed() {
        for ctx in create_contexts().await {
            let (salon, client, service) = insert_directory(&ctx).await;
            let mut appointment = Appointment::new(
                salon.id,
                client.id,
                service.id,
                NOW + HOUR_MILLIS,
                NOW + 2 * HOUR_MILLIS,
                NOW,
            );
            appointment.status = AppointmentStatus::Cancelled;
            ctx.repos.appointments.insert(&appointment).await.unwrap();

            assert!(!ctx
                .repos
                .appointments
                .claim_sms_confirmation(&appointment.id, SmsConfirmationType::ImmediateLt24h)
                .await
                .unwrap());
            assert!(!ctx
                .repos
                .appointments
                .claim_sms_reminder(&appointment.id)
                .await
                .unwrap());
        }
    }

    #[tokio::test]
    async fn finds_deferred_confirmation_candidates_inside_window() {
        for ctx in create_contexts().await {
            let repo = &ctx.repos.appointments;
            let in_window = insert_appointment(&ctx, 48 * HOUR_MILLIS).await;
            let too_recent = insert_appointment(&ctx, 48 * HOUR_MILLIS).await;
            let opened = insert_appointment(&ctx, 48 * HOUR_MILLIS).await;
            let never_sent = insert_appointment(&ctx, 48 * HOUR_MILLIS).await;

            repo.mark_email_sent(&in_window.id, NOW).await.unwrap();
            repo.mark_email_sent(&too_recent.id, NOW + 2 * HOUR_MILLIS)
                .await
                .unwrap();
            repo.mark_email_sent(&opened.id, NOW).await.unwrap();
            repo.mark_email_opened(&opened.id, NOW + HOUR_MILLIS)
                .await
                .unwrap();

            let window = deferred_confirmation_window(NOW + 4 * HOUR_MILLIS);
            let ids = repo
                .find_deferred_confirmation_candidates(&window)
                .await
                .unwrap()
                .into_iter()
                .map(|a| a.id)
                .collect::<Vec<_>>();
            assert!(ids.contains(&in_window.id));
            assert!(!ids.contains(&too_recent.id));
            assert!(!ids.contains(&opened.id));
            assert!(!ids.contains(&never_sent.id));
        }
    }

    #[tokio::test]
    async fn finds_reminder_candidates_inside_window() {
        for ctx in create_contexts().await {
            let repo = &ctx.repos.appointments;
            let due = insert_appointment(&ctx, 48 * HOUR_MILLIS).await;
            let later = insert_appointment(&ctx, 49 * HOUR_MILLIS).await;
            let skipped = insert_appointment(&ctx, 48 * HOUR_MILLIS).await;
            repo.claim_sms_confirmation(&skipped.id, SmsConfirmationType::ImmediateLt24h)
                .await
                .unwrap();

            let window = reminder_window(NOW + 24 * HOUR_MILLIS - REMINDER_WINDOW, REMINDER_WINDOW);
            let ids = repo
                .find_reminder_candidates(&window)
                .await
                .unwrap()
                .into_iter()
                .map(|a| a.id)
                .collect::<Vec<_>>();
            assert!(ids.contains(&due.id));
            assert!(!ids.contains(&later.id));
            assert!(!ids.contains(&skipped.id));
        }
    }
}
