use super::IEmailEventRepo;
use salon_notifier_domain::{EmailEvent, EmailEventType, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresEmailEventRepo {
    pool: PgPool,
}

impl PostgresEmailEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EmailEventRaw {
    event_uid: Uuid,
    appointment_uid: Uuid,
    event_type: String,
    provider: String,
    provider_event_id: Option<String>,
    event_ts: i64,
    metadata: serde_json::Value,
}

impl From<EmailEventRaw> for EmailEvent {
    fn from(raw: EmailEventRaw) -> Self {
        Self {
            id: raw.event_uid.into(),
            appointment_id: raw.appointment_uid.into(),
            // Unknown types are kept as `other`
            event_type: raw
                .event_type
                .parse::<EmailEventType>()
                .unwrap_or(EmailEventType::Other),
            provider: raw.provider,
            provider_event_id: raw.provider_event_id,
            timestamp: raw.event_ts,
            metadata: raw.metadata,
        }
    }
}

#[async_trait::async_trait]
impl IEmailEventRepo for PostgresEmailEventRepo {
    async fn insert(&self, event: &EmailEvent) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO email_events
            (event_uid, appointment_uid, event_type, provider, provider_event_id, event_ts, metadata)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(event.id.inner_ref())
        .bind(event.appointment_id.inner_ref())
        .bind(event.event_type.as_str())
        .bind(&event.provider)
        .bind(&event.provider_event_id)
        .bind(event.timestamp)
        .bind(&event.metadata)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert email event: {:?}. DB returned error: {:?}",
                event, e
            );
            e
        })?;
        Ok(())
    }

    async fn find_by_appointment(&self, appointment_id: &ID) -> anyhow::Result<Vec<EmailEvent>> {
        let rows: Vec<EmailEventRaw> = sqlx::query_as(
            r#"
            SELECT * FROM email_events
            WHERE appointment_uid = $1
            ORDER BY event_ts ASC
            "#,
        )
        .bind(appointment_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|raw| raw.into()).collect())
    }
}
