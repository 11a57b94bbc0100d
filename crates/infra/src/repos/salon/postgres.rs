use super::ISalonRepo;
use salon_notifier_domain::{Salon, Tz, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresSalonRepo {
    pool: PgPool,
}

impl PostgresSalonRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SalonRaw {
    salon_uid: Uuid,
    name: String,
    timezone: String,
    phone: Option<String>,
}

impl TryFrom<SalonRaw> for Salon {
    type Error = String;

    fn try_from(raw: SalonRaw) -> Result<Self, Self::Error> {
        Ok(Self {
            id: raw.salon_uid.into(),
            name: raw.name,
            timezone: raw.timezone.parse::<Tz>().map_err(|e| e.to_string())?,
            phone: raw.phone,
        })
    }
}

#[async_trait::async_trait]
impl ISalonRepo for PostgresSalonRepo {
    async fn insert(&self, salon: &Salon) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO salons(salon_uid, name, timezone, phone)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(salon.id.inner_ref())
        .bind(&salon.name)
        .bind(salon.timezone.name())
        .bind(&salon.phone)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert salon: {:?}. DB returned error: {:?}",
                salon, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, salon_id: &ID) -> Option<Salon> {
        let raw: SalonRaw = sqlx::query_as(
            r#"
            SELECT * FROM salons
            WHERE salon_uid = $1
            "#,
        )
        .bind(salon_id.inner_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find salon with id: {} failed. DB returned error: {:?}",
                salon_id, e
            );
            e
        })
        .ok()?;
        Salon::try_from(raw)
            .map_err(|e| error!("Salon: {} has an invalid timezone: {}", salon_id, e))
            .ok()
    }
}
