use super::IAppointmentRepo;
use crate::repos::shared::NOTIFIABLE_STATUS_SQL;
use salon_notifier_domain::{
    Appointment, AppointmentStatus, NotificationState, SmsConfirmationType, TimeWindow, ID,
};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs a conditional update and reports whether a row matched
    async fn update_where(&self, sql: &str, appointment_id: &ID) -> anyhow::Result<bool> {
        let res = sqlx::query(sql)
            .bind(appointment_id.inner_ref())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    "Conditional update of appointment: {} failed. DB returned error: {:?}",
                    appointment_id, e
                );
                e
            })?;
        Ok(res.rows_affected() == 1)
    }

    async fn fetch_many(&self, sql: &str, window: &TimeWindow) -> anyhow::Result<Vec<Appointment>> {
        let rows: Vec<AppointmentRaw> = sqlx::query_as(sql)
            .bind(window.start)
            .bind(window.end)
            .fetch_all(&self.pool)
            .await?;
        Ok(into_appointments(rows))
    }
}

#[derive(Debug, FromRow)]
struct AppointmentRaw {
    appointment_uid: Uuid,
    salon_uid: Uuid,
    client_uid: Uuid,
    service_uid: Uuid,
    stylist_uid: Option<Uuid>,
    start_ts: i64,
    end_ts: i64,
    created: i64,
    status: String,
    email_sent_at: Option<i64>,
    email_opened_at: Option<i64>,
    sms_confirmation_sent: bool,
    sms_confirmation_type: Option<String>,
    sms_reminder_sent: bool,
    skip_reminder_sms: bool,
}

impl TryFrom<AppointmentRaw> for Appointment {
    type Error = String;

    fn try_from(raw: AppointmentRaw) -> Result<Self, Self::Error> {
        let sms_confirmation_type = match raw.sms_confirmation_type {
            Some(t) => Some(t.parse::<SmsConfirmationType>()?),
            None => None,
        };
        Ok(Self {
            id: raw.appointment_uid.into(),
            salon_id: raw.salon_uid.into(),
            client_id: raw.client_uid.into(),
            service_id: raw.service_uid.into(),
            stylist_id: raw.stylist_uid.map(|id| id.into()),
            start_ts: raw.start_ts,
            end_ts: raw.end_ts,
            created: raw.created,
            status: raw.status.parse::<AppointmentStatus>()?,
            notifications: NotificationState {
                email_sent_at: raw.email_sent_at,
                email_opened_at: raw.email_opened_at,
                sms_confirmation_sent: raw.sms_confirmation_sent,
                sms_confirmation_type,
                sms_reminder_sent: raw.sms_reminder_sent,
                skip_reminder_sms: raw.skip_reminder_sms,
            },
        })
    }
}

fn into_appointments(rows: Vec<AppointmentRaw>) -> Vec<Appointment> {
    rows.into_iter()
        .filter_map(|raw| {
            let id = raw.appointment_uid;
            Appointment::try_from(raw)
                .map_err(|e| error!("Skipping malformed appointment row {}: {}", id, e))
                .ok()
        })
        .collect()
}

#[async_trait::async_trait]
impl IAppointmentRepo for PostgresAppointmentRepo {
    async fn insert(&self, appointment: &Appointment) -> anyhow::Result<()> {
        let n = &appointment.notifications;
        sqlx::query(
            r#"
            INSERT INTO appointments
            (appointment_uid, salon_uid, client_uid, service_uid, stylist_uid, start_ts, end_ts,
             created, status, email_sent_at, email_opened_at, sms_confirmation_sent,
             sms_confirmation_type, sms_reminder_sent, skip_reminder_sms)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(appointment.id.inner_ref())
        .bind(appointment.salon_id.inner_ref())
        .bind(appointment.client_id.inner_ref())
        .bind(appointment.service_id.inner_ref())
        .bind(appointment.stylist_id.as_ref().map(|id| *id.inner_ref()))
        .bind(appointment.start_ts)
        .bind(appointment.end_ts)
        .bind(appointment.created)
        .bind(appointment.status.as_str())
        .bind(n.email_sent_at)
        .bind(n.email_opened_at)
        .bind(n.sms_confirmation_sent)
        .bind(n.sms_confirmation_type.map(|t| t.as_str()))
        .bind(n.sms_reminder_sent)
        .bind(n.skip_reminder_sms)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert appointment: {:?}. DB returned error: {:?}",
                appointment, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, appointment_id: &ID) -> Option<Appointment> {
        let raw: Option<AppointmentRaw> = sqlx::query_as(
            r#"
            SELECT * FROM appointments
            WHERE appointment_uid = $1
            "#,
        )
        .bind(appointment_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find appointment with id: {} failed. DB returned error: {:?}",
                appointment_id, e
            );
            e
        })
        .ok()?;
        into_appointments(raw.into_iter().collect()).pop()
    }

    async fn find_latest_by_clients(&self, client_ids: &[ID]) -> Option<Appointment> {
        let ids = client_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();
        let raw: Option<AppointmentRaw> = sqlx::query_as(
            r#"
            SELECT * FROM appointments
            WHERE client_uid = ANY($1)
            ORDER BY created DESC
            LIMIT 1
            "#,
        )
        .bind(&ids)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find latest appointment for clients: {:?} failed. DB returned error: {:?}",
                client_ids, e
            );
            e
        })
        .ok()?;
        into_appointments(raw.into_iter().collect()).pop()
    }

    async fn mark_email_sent(&self, appointment_id: &ID, sent_at: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE appointments
            SET email_sent_at = $2
            WHERE appointment_uid = $1 AND email_sent_at IS NULL
            "#,
        )
        .bind(appointment_id.inner_ref())
        .bind(sent_at)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn mark_email_opened(
        &self,
        appointment_id: &ID,
        opened_at: i64,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE appointments
            SET email_opened_at = $2
            WHERE appointment_uid = $1 AND email_opened_at IS NULL
            "#,
        )
        .bind(appointment_id.inner_ref())
        .bind(opened_at)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn claim_sms_confirmation(
        &self,
        appointment_id: &ID,
        confirmation_type: SmsConfirmationType,
    ) -> anyhow::Result<bool> {
        let sql = format!(
            r#"
            UPDATE appointments
            SET sms_confirmation_sent = true,
                sms_confirmation_type = $2,
                skip_reminder_sms = skip_reminder_sms OR $3
            WHERE appointment_uid = $1
                AND NOT sms_confirmation_sent
                AND (NOT $4 OR email_opened_at IS NULL)
                AND {}
            "#,
            NOTIFIABLE_STATUS_SQL
        );
        let res = sqlx::query(&sql)
            .bind(appointment_id.inner_ref())
            .bind(confirmation_type.as_str())
            .bind(confirmation_type.replaces_reminder())
            .bind(confirmation_type.requires_unopened_email())
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn release_sms_confirmation(
        &self,
        appointment_id: &ID,
        confirmation_type: SmsConfirmationType,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE appointments
            SET sms_confirmation_sent = false,
                sms_confirmation_type = NULL,
                skip_reminder_sms = skip_reminder_sms AND NOT $3
            WHERE appointment_uid = $1 AND sms_confirmation_sent AND sms_confirmation_type = $2
            "#,
        )
        .bind(appointment_id.inner_ref())
        .bind(confirmation_type.as_str())
        .bind(confirmation_type.replaces_reminder())
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn enable_reminder_sms(&self, appointment_id: &ID) -> anyhow::Result<bool> {
        self.update_where(
            r#"
            UPDATE appointments
            SET skip_reminder_sms = false
            WHERE appointment_uid = $1
              AND sms_confirmation_type IS DISTINCT FROM 'immediate_lt24h'
            "#,
            appointment_id,
        )
        .await
    }

    async fn claim_sms_reminder(&self, appointment_id: &ID) -> anyhow::Result<bool> {
        let sql = format!(
            r#"
            UPDATE appointments
            SET sms_reminder_sent = true
            WHERE appointment_uid = $1
              AND NOT sms_reminder_sent
              AND NOT skip_reminder_sms
              AND {}
            "#,
            NOTIFIABLE_STATUS_SQL
        );
        self.update_where(&sql, appointment_id).await
    }

    async fn release_sms_reminder(&self, appointment_id: &ID) -> anyhow::Result<bool> {
        self.update_where(
            r#"
            UPDATE appointments
            SET sms_reminder_sent = false
            WHERE appointment_uid = $1 AND sms_reminder_sent
            "#,
            appointment_id,
        )
        .await
    }

    async fn find_deferred_confirmation_candidates(
        &self,
        email_sent: &TimeWindow,
    ) -> anyhow::Result<Vec<Appointment>> {
        let sql = format!(
            r#"
            SELECT * FROM appointments
            WHERE email_sent_at > $1 AND email_sent_at <= $2
              AND email_opened_at IS NULL
              AND NOT sms_confirmation_sent
              AND {}
            "#,
            NOTIFIABLE_STATUS_SQL
        );
        self.fetch_many(&sql, email_sent).await
    }

    async fn find_reminder_candidates(
        &self,
        start: &TimeWindow,
    ) -> anyhow::Result<Vec<Appointment>> {
        let sql = format!(
            r#"
            SELECT * FROM appointments
            WHERE start_ts > $1 AND start_ts <= $2
              AND NOT sms_reminder_sent
              AND NOT skip_reminder_sms
              AND {}
            "#,
            NOTIFIABLE_STATUS_SQL
        );
        self.fetch_many(&sql, start).await
    }
}
