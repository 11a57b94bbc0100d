use salon_notifier_domain::{Appointment, NotificationContext, ID};
use salon_notifier_infra::NotifierContext;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContextError {
    #[error("The appointment with id: {0}, was not found")]
    AppointmentNotFound(ID),
    #[error("The {entity} with id: {id}, referenced by appointment: {appointment_id} was not found")]
    Missing {
        entity: &'static str,
        id: ID,
        appointment_id: ID,
    },
}

/// Loads everything a notification template needs for one appointment
pub struct NotificationContextBuilder<'a> {
    ctx: &'a NotifierContext,
}

impl<'a> NotificationContextBuilder<'a> {
    pub fn new(ctx: &'a NotifierContext) -> Self {
        Self { ctx }
    }

    pub async fn build(&self, appointment_id: &ID) -> Result<NotificationContext, ContextError> {
        let appointment = self
            .ctx
            .repos
            .appointments
            .find(appointment_id)
            .await
            .ok_or_else(|| ContextError::AppointmentNotFound(appointment_id.clone()))?;
        self.build_for(appointment).await
    }

    /// Same as `build` for an appointment that is already loaded
    pub async fn build_for(
        &self,
        appointment: Appointment,
    ) -> Result<NotificationContext, ContextError> {
        let repos = &self.ctx.repos;
        let missing = |entity: &'static str, id: &ID| ContextError::Missing {
            entity,
            id: id.clone(),
            appointment_id: appointment.id.clone(),
        };

        let client = repos
            .clients
            .find(&appointment.client_id)
            .await
            .ok_or_else(|| missing("client", &appointment.client_id))?;
        let service = repos
            .salon_services
            .find(&appointment.service_id)
            .await
            .ok_or_else(|| missing("service", &appointment.service_id))?;
        let salon = repos
            .salons
            .find(&appointment.salon_id)
            .await
            .ok_or_else(|| missing("salon", &appointment.salon_id))?;
        // A stylist that left the salon does not block the notification
        let stylist = match &appointment.stylist_id {
            Some(stylist_id) => repos.stylists.find(stylist_id).await,
            None => None,
        };

        Ok(NotificationContext {
            appointment,
            client,
            service,
            stylist,
            salon,
        })
    }
}
