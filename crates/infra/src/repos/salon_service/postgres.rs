use super::ISalonServiceRepo;
use salon_notifier_domain::{SalonService, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresSalonServiceRepo {
    pool: PgPool,
}

impl PostgresSalonServiceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SalonServiceRaw {
    service_uid: Uuid,
    salon_uid: Uuid,
    name: String,
    duration_minutes: i32,
}

impl From<SalonServiceRaw> for SalonService {
    fn from(raw: SalonServiceRaw) -> Self {
        Self {
            id: raw.service_uid.into(),
            salon_id: raw.salon_uid.into(),
            name: raw.name,
            duration_minutes: raw.duration_minutes,
        }
    }
}

#[async_trait::async_trait]
impl ISalonServiceRepo for PostgresSalonServiceRepo {
    async fn insert(&self, service: &SalonService) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO salon_services(service_uid, salon_uid, name, duration_minutes)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(service.id.inner_ref())
        .bind(service.salon_id.inner_ref())
        .bind(&service.name)
        .bind(service.duration_minutes)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert salon service: {:?}. DB returned error: {:?}",
                service, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, service_id: &ID) -> Option<SalonService> {
        let raw: SalonServiceRaw = sqlx::query_as(
            r#"
            SELECT * FROM salon_services
            WHERE service_uid = $1
            "#,
        )
        .bind(service_id.inner_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find salon service with id: {} failed. DB returned error: {:?}",
                service_id, e
            );
            e
        })
        .ok()?;
        Some(raw.into())
    }
}
