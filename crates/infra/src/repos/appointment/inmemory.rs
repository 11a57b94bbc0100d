use super::IAppointmentRepo;
use crate::repos::shared::inmemory_repo::*;
use salon_notifier_domain::{Appointment, SmsConfirmationType, TimeWindow, ID};

pub struct InMemoryAppointmentRepo {
    appointments: std::sync::Mutex<Vec<Appointment>>,
}

impl InMemoryAppointmentRepo {
    pub fn new() -> Self {
        Self {
            appointments: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IAppointmentRepo for InMemoryAppointmentRepo {
    async fn insert(&self, appointment: &Appointment) -> anyhow::Result<()> {
        insert(appointment, &self.appointments);
        Ok(())
    }

    async fn find(&self, appointment_id: &ID) -> Option<Appointment> {
        find(appointment_id, &self.appointments)
    }

    async fn find_latest_by_clients(&self, client_ids: &[ID]) -> Option<Appointment> {
        find_by(&self.appointments, |a| client_ids.contains(&a.client_id))
            .into_iter()
            .max_by_key(|a| a.created)
    }

    async fn mark_email_sent(&self, appointment_id: &ID, sent_at: i64) -> anyhow::Result<bool> {
        Ok(update_if(
            appointment_id,
            &self.appointments,
            |a| a.notifications.email_sent_at.is_none(),
            |a| a.notifications.email_sent_at = Some(sent_at),
        ))
    }

    async fn mark_email_opened(
        &self,
        appointment_id: &ID,
        opened_at: i64,
    ) -> anyhow::Result<bool> {
        Ok(update_if(
            appointment_id,
            &self.appointments,
            |a| a.notifications.email_opened_at.is_none(),
            |a| a.notifications.email_opened_at = Some(opened_at),
        ))
    }

    async fn claim_sms_confirmation(
        &self,
        appointment_id: &ID,
        confirmation_type: SmsConfirmationType,
    ) -> anyhow::Result<bool> {
        Ok(update_if(
            appointment_id,
            &self.appointments,
            |a| {
                a.is_notifiable()
                    && !a.notifications.sms_confirmation_sent
                    && (!confirmation_type.requires_unopened_email()
                        || a.notifications.email_opened_at.is_none())
            },
            |a| {
                a.notifications.sms_confirmation_sent = true;
                a.notifications.sms_confirmation_type = Some(confirmation_type);
                if confirmation_type.replaces_reminder() {
                    a.notifications.skip_reminder_sms = true;
                }
            },
        ))
    }

    async fn release_sms_confirmation(
        &self,
        appointment_id: &ID,
        confirmation_type: SmsConfirmationType,
    ) -> anyhow::Result<bool> {
        Ok(update_if(
            appointment_id,
            &self.appointments,
            |a| {
                a.notifications.sms_confirmation_sent
                    && a.notifications.sms_confirmation_type == Some(confirmation_type)
            },
            |a| {
                a.notifications.sms_confirmation_sent = false;
                a.notifications.sms_confirmation_type = None;
                if confirmation_type.replaces_reminder() {
                    a.notifications.skip_reminder_sms = false;
                }
            },
        ))
    }

    async fn enable_reminder_sms(&self, appointment_id: &ID) -> anyhow::Result<bool> {
        Ok(update_if(
            appointment_id,
            &self.appointments,
            |a| {
                a.notifications.sms_confirmation_type != Some(SmsConfirmationType::ImmediateLt24h)
            },
            |a| a.notifications.skip_reminder_sms = false,
        ))
    }

    async fn claim_sms_reminder(&self, appointment_id: &ID) -> anyhow::Result<bool> {
        Ok(update_if(
            appointment_id,
            &self.appointments,
            |a| {
                a.is_notifiable()
                    && !a.notifications.sms_reminder_sent
                    && !a.notifications.skip_reminder_sms
            },
            |a| a.notifications.sms_reminder_sent = true,
        ))
    }

    async fn release_sms_reminder(&self, appointment_id: &ID) -> anyhow::Result<bool> {
        Ok(update_if(
            appointment_id,
            &self.appointments,
            |a| a.notifications.sms_reminder_sent,
            |a| a.notifications.sms_reminder_sent = false,
        ))
    }

    async fn find_deferred_confirmation_candidates(
        &self,
        email_sent: &TimeWindow,
    ) -> anyhow::Result<Vec<Appointment>> {
        Ok(find_by(&self.appointments, |a| {
            let n = &a.notifications;
            a.is_notifiable()
                && n.email_sent_at.map(|ts| email_sent.contains(ts)).unwrap_or(false)
                && n.email_opened_at.is_none()
                && !n.sms_confirmation_sent
        }))
    }

    async fn find_reminder_candidates(
        &self,
        start: &TimeWindow,
    ) -> anyhow::Result<Vec<Appointment>> {
        Ok(find_by(&self.appointments, |a| {
            a.is_notifiable()
                && start.contains(a.start_ts)
                && !a.notifications.sms_reminder_sent
                && !a.notifications.skip_reminder_sms
        }))
    }
}
